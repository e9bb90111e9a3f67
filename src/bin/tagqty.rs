//! CLI tool for tag/quantity extraction and benchmarking

use pdf_tagqty::{
    evaluate, extract_document, load_reference, load_tokens, rank_reports, tag_set_metrics,
    EvaluationReport, ExtractionConfig, PairingStrategy, StrategyKind, TagQuantityMap,
};
use std::env;
use std::process;

const ENSEMBLE: &str = "ensemble";

struct Options {
    tokens_path: String,
    reference_path: Option<String>,
    json: bool,
    strategies: Option<String>,
    threads: Option<usize>,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <tokens.tsv> [reference.csv] [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json                 Print results as JSON");
    eprintln!("  --strategy a,b,...     Run only the named strategies");
    eprintln!("  --threads N            Worker threads (default: all cores)");
    eprintln!();
    eprintln!("Strategies:");
    for kind in StrategyKind::ALL {
        eprintln!("  {}", kind.name());
    }
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let program = args.first().map(String::as_str).unwrap_or("tagqty");
    let mut positional = Vec::new();
    let mut json = false;
    let mut strategies = None;
    let mut threads = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--strategy" => match iter.next() {
                Some(list) => strategies = Some(list.clone()),
                None => usage(program),
            },
            "--threads" => match iter.next().and_then(|n| n.parse::<usize>().ok()) {
                Some(n) if n > 0 => threads = Some(n),
                _ => usage(program),
            },
            "-h" | "--help" => usage(program),
            other if other.starts_with("--") => usage(program),
            other => positional.push(other.to_string()),
        }
    }

    let mut positional = positional.into_iter();
    let Some(tokens_path) = positional.next() else {
        usage(program)
    };
    let reference_path = positional.next();
    if positional.next().is_some() {
        usage(program);
    }

    Options {
        tokens_path,
        reference_path,
        json,
        strategies,
        threads,
    }
}

fn select_strategies(
    list: Option<&str>,
    config: &ExtractionConfig,
) -> pdf_tagqty::Result<Vec<Box<dyn PairingStrategy>>> {
    match list {
        None => Ok(pdf_tagqty::all_strategies(config)),
        Some(list) => list
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| StrategyKind::from_name(name).map(|kind| kind.build(config)))
            .collect(),
    }
}

fn fail(json: bool, message: &str) -> ! {
    if json {
        println!(r#"{{"error":"{}"}}"#, escape(message));
    } else {
        eprintln!("Error: {}", message);
    }
    process::exit(1);
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn pairs_json(map: &TagQuantityMap) -> String {
    let pairs: Vec<String> = map
        .iter()
        .map(|(tag, qty)| format!(r#""{}":{}"#, escape(tag), qty))
        .collect();
    format!("{{{}}}", pairs.join(","))
}

fn report_json(report: &EvaluationReport, map: &TagQuantityMap, reference: &TagQuantityMap) -> String {
    let metrics = tag_set_metrics(map, reference);
    format!(
        r#"{{"accuracy":{:.2},"correct":{},"wrong":{},"missing":{},"extra":{},"precision":{:.4},"recall":{:.4},"f1":{:.4}}}"#,
        report.accuracy,
        report.correct,
        report.wrong,
        report.missing,
        report.extra,
        metrics.precision,
        metrics.recall,
        metrics.f1
    )
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let config = ExtractionConfig {
        threads: options.threads,
        ..Default::default()
    };

    let strategies = match select_strategies(options.strategies.as_deref(), &config) {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => fail(options.json, "no strategies selected"),
        Err(e) => fail(options.json, &e.to_string()),
    };

    let document = match load_tokens(&options.tokens_path) {
        Ok(d) => d,
        Err(e) => fail(options.json, &e.to_string()),
    };

    let reference = match options.reference_path.as_deref().map(load_reference) {
        None => None,
        Some(Ok(r)) => Some(r),
        Some(Err(e)) => fail(options.json, &e.to_string()),
    };

    let result = match extract_document(&document, &strategies, &config) {
        Ok(r) => r,
        Err(e) => fail(options.json, &e.to_string()),
    };

    // strategies plus the ensemble, in run order
    let mut outputs: Vec<(String, &TagQuantityMap)> = result
        .strategies
        .iter()
        .map(|o| (o.name.clone(), &o.map))
        .collect();
    outputs.push((ENSEMBLE.to_string(), &result.ensemble.merged));

    if options.json {
        let entries: Vec<String> = outputs
            .iter()
            .map(|(name, map)| {
                let evaluation = reference
                    .as_ref()
                    .map(|r| report_json(&evaluate(map, &r.quantities), map, &r.quantities))
                    .unwrap_or_else(|| "null".to_string());
                format!(
                    r#"{{"name":"{}","tag_count":{},"pairs":{},"evaluation":{}}}"#,
                    escape(name),
                    map.len(),
                    pairs_json(map),
                    evaluation
                )
            })
            .collect();
        println!(
            r#"{{"page_count":{},"token_count":{},"processing_time_ms":{},"reference_count":{},"disputed_tags":{},"strategies":[{}]}}"#,
            result.page_count,
            document.token_count(),
            result.processing_time_ms,
            reference
                .as_ref()
                .map(|r| r.quantities.len().to_string())
                .unwrap_or_else(|| "null".to_string()),
            result.ensemble.votes.disputed().count(),
            entries.join(",")
        );
        return;
    }

    println!("Tag/Quantity Extraction");
    println!("=======================");
    println!("File: {}", options.tokens_path);
    println!("Pages: {}", result.page_count);
    println!("Tokens: {}", document.token_count());
    println!("Processing time: {}ms", result.processing_time_ms);
    println!();

    let Some(reference) = reference else {
        println!("{:<18} {:>6}", "Strategy", "Tags");
        println!("{}", "-".repeat(25));
        for (name, map) in &outputs {
            println!("{:<18} {:>6}", name, map.len());
        }
        println!();
        println!("--- Ensemble pairs ---");
        for (tag, qty) in result.ensemble.merged.iter() {
            println!("{:<16} {:>4}", tag, qty);
        }
        let disputed: Vec<_> = result.ensemble.votes.disputed().collect();
        if !disputed.is_empty() {
            println!();
            println!("--- Disputed tags ---");
            for (tag, votes) in disputed {
                let detail: Vec<String> = votes
                    .iter()
                    .map(|v| format!("{} ({})", v.quantity, v.strategies.join(", ")))
                    .collect();
                println!("{:<16} {}", tag, detail.join(" | "));
            }
        }
        return;
    };

    println!(
        "Reference: {} tags ({} rows skipped)",
        reference.quantities.len(),
        reference.skipped
    );
    println!();

    let reports: Vec<(String, EvaluationReport)> = outputs
        .iter()
        .map(|(name, map)| (name.clone(), evaluate(map, &reference.quantities)))
        .collect();
    let ranked = rank_reports(&reports);

    println!(
        "{:<4} {:<18} {:>9} {:>8} {:>6} {:>8} {:>6} {:>6}",
        "Rank", "Strategy", "Accuracy", "Correct", "Wrong", "Missing", "Extra", "F1"
    );
    println!("{}", "-".repeat(72));
    for (rank, (name, report)) in ranked.iter().enumerate() {
        let map = outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| *m);
        let f1 = map
            .map(|m| tag_set_metrics(m, &reference.quantities).f1)
            .unwrap_or(0.0);
        println!(
            "{:<4} {:<18} {:>8.1}% {:>8} {:>6} {:>8} {:>6} {:>6.3}",
            rank + 1,
            name,
            report.accuracy,
            report.correct,
            report.wrong,
            report.missing,
            report.extra,
            f1
        );
    }

    if let Some((name, best)) = ranked.first() {
        println!();
        println!("--- Details for {} ---", name);
        if !best.mismatches.is_empty() {
            println!("Wrong quantities:");
            for m in &best.mismatches {
                println!("  {}: expected {}, got {}", m.tag, m.expected, m.extracted);
            }
        }
        if !best.missing_tags.is_empty() {
            println!("Missing: {}", best.missing_tags.join(", "));
        }
        if !best.extra_tags.is_empty() {
            println!("Not in reference: {}", best.extra_tags.join(", "));
        }
    }
}
