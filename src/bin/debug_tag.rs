//! Debug tool: show the line holding a tag and every quantity candidate on it

use pdf_tagqty::pairing::{identifiers, quantities, DEFAULT_MAX_PAIR_DISTANCE};
use pdf_tagqty::recognize::{canonicalize_tag, recognize_quantity, recognize_tag};
use pdf_tagqty::{cluster_lines, load_tokens, ExtractionConfig};
use std::env;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        let program = args.first().map(String::as_str).unwrap_or("debug_tag");
        eprintln!("Usage: {} <tokens.tsv> <TAG>", program);
        process::exit(1);
    }

    let document = match load_tokens(&args[1]) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let target = canonicalize_tag(args[2].trim());
    let config = ExtractionConfig::default();

    let mut found = false;
    for page in document.pages() {
        let lines = cluster_lines(&page.tokens, config.line_tolerance);
        for line in &lines {
            let tags = identifiers(line);
            if !tags.iter().any(|t| t.tag == target) {
                continue;
            }
            found = true;

            println!("Page {} line y={}:", page.number, line.y);
            for token in &line.tokens {
                if recognize_tag(&token.text).is_some() {
                    println!("  TAG: {} @ x={:.0}", token.text, token.x);
                } else if recognize_quantity(&token.text).is_some() {
                    println!("  NUM: {} @ x={:.0}", token.text, token.x);
                } else {
                    println!("       {} @ x={:.0}", token.text, token.x);
                }
            }

            let candidates = quantities(line);
            println!();
            println!(
                "Tags: {:?}",
                tags.iter().map(|t| t.tag.as_str()).collect::<Vec<_>>()
            );
            println!(
                "Numbers: {:?}",
                candidates.iter().map(|c| c.value).collect::<Vec<_>>()
            );

            for ident in tags.iter().filter(|t| t.tag == target) {
                println!();
                println!("Candidates for {} @ x={:.0}:", ident.tag, ident.x);
                for c in &candidates {
                    let dist = c.x - ident.x;
                    println!(
                        "  {} @ x={:.0}: dist={:+.0}, right={}, <{}={}",
                        c.value,
                        c.x,
                        dist,
                        dist > 0.0,
                        DEFAULT_MAX_PAIR_DISTANCE,
                        dist.abs() < DEFAULT_MAX_PAIR_DISTANCE
                    );
                }
            }
            println!();
        }
    }

    if !found {
        eprintln!("Tag {} not found in {}", target, args[1]);
        process::exit(2);
    }
}
