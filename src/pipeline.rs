//! Document-level extraction
//!
//! Pages are laid out and paired in parallel; the per-page maps are then
//! folded in ascending page order so the first page a tag appears on always
//! decides its quantity, whatever order the workers finished in.

use crate::columns::ColumnSettings;
use crate::ensemble::{combine, EnsembleResult};
use crate::lines::DEFAULT_LINE_TOLERANCE;
use crate::pairing::{
    HeaderVocabulary, PageLayout, PairingStrategy, DEFAULT_HEADER_SCAN_LINES,
    DEFAULT_HEADER_TOLERANCE, DEFAULT_MAX_PAIR_DISTANCE,
};
use crate::tagmap::TagQuantityMap;
use crate::tokens::Document;
use crate::{Error, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Extraction tuning
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// y distance within which tokens share a line
    pub line_tolerance: f32,
    /// Column detection parameters
    pub columns: ColumnSettings,
    /// Directional strategy search radius
    pub max_pair_distance: f32,
    /// Header words per role
    pub header_vocabulary: HeaderVocabulary,
    /// Number of leading lines searched for a header
    pub header_scan_lines: usize,
    /// Max x distance between a value and its header anchor
    pub header_tolerance: f32,
    /// Worker threads; `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
            columns: ColumnSettings::default(),
            max_pair_distance: DEFAULT_MAX_PAIR_DISTANCE,
            header_vocabulary: HeaderVocabulary::default(),
            header_scan_lines: DEFAULT_HEADER_SCAN_LINES,
            header_tolerance: DEFAULT_HEADER_TOLERANCE,
            threads: None,
        }
    }
}

/// Document-level output of one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub name: String,
    pub map: TagQuantityMap,
}

/// Result of running a set of strategies over a document
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    /// One outcome per strategy, in the order the strategies were given
    pub strategies: Vec<StrategyOutcome>,
    /// Majority vote over `strategies`
    pub ensemble: EnsembleResult,
    pub page_count: usize,
    pub processing_time_ms: u64,
}

impl DocumentExtraction {
    /// Outcome of the named strategy
    pub fn strategy(&self, name: &str) -> Option<&TagQuantityMap> {
        self.strategies
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.map)
    }
}

/// Run one strategy over a whole document
pub fn run_strategy(
    document: &Document,
    strategy: &dyn PairingStrategy,
    config: &ExtractionConfig,
) -> TagQuantityMap {
    let mut merged = TagQuantityMap::new();
    for page in document.pages() {
        let layout = PageLayout::build(page, config);
        merged.merge_first_seen(&strategy.pair_page(&layout));
    }
    merged
}

/// Run every strategy over every page and combine the results
pub fn extract_document(
    document: &Document,
    strategies: &[Box<dyn PairingStrategy>],
    config: &ExtractionConfig,
) -> Result<DocumentExtraction> {
    let start = std::time::Instant::now();

    let pair_pages = || -> Vec<Vec<TagQuantityMap>> {
        document
            .pages()
            .par_iter()
            .map(|page| {
                let layout = PageLayout::build(page, config);
                log::debug!(
                    "Page {}: {} lines, {} columns",
                    layout.page,
                    layout.lines.len(),
                    layout.columns.len()
                );
                strategies
                    .iter()
                    .map(|strategy| strategy.pair_page(&layout))
                    .collect::<Vec<_>>()
            })
            .collect()
    };

    let per_page = match config.threads {
        Some(threads) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            pool.install(pair_pages)
        }
        None => pair_pages(),
    };

    let mut merged: Vec<TagQuantityMap> = vec![TagQuantityMap::new(); strategies.len()];
    for page_maps in &per_page {
        for (acc, page_map) in merged.iter_mut().zip(page_maps) {
            acc.merge_first_seen(page_map);
        }
    }

    let outcomes: Vec<StrategyOutcome> = strategies
        .iter()
        .zip(merged)
        .map(|(strategy, map)| {
            log::debug!("Strategy {}: {} tags", strategy.name(), map.len());
            StrategyOutcome {
                name: strategy.name().to_string(),
                map,
            }
        })
        .collect();

    let ensemble = combine(outcomes.iter().map(|o| (o.name.as_str(), &o.map)));
    let processing_time_ms = start.elapsed().as_millis() as u64;
    log::info!(
        "Extracted {} tags from {} pages with {} strategies in {}ms",
        ensemble.merged.len(),
        document.page_count(),
        strategies.len(),
        processing_time_ms
    );

    Ok(DocumentExtraction {
        strategies: outcomes,
        ensemble,
        page_count: document.page_count(),
        processing_time_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::{all_strategies, DirectionalNearest};
    use crate::tokens::{Page, Token};

    fn row(tag: &str, qty: &str, y: f32) -> Vec<Token> {
        vec![Token::new(tag, 100.0, y), Token::new(qty, 180.0, y)]
    }

    #[test]
    fn test_first_page_wins() {
        let document = Document::new(vec![
            Page::new(3, row("ABC123-0001", "7", 10.0)),
            Page::new(1, row("ABC123-0001", "5", 10.0)),
            Page::new(2, Vec::new()),
        ]);
        let config = ExtractionConfig::default();
        let result = extract_document(&document, &all_strategies(&config), &config).unwrap();
        assert_eq!(result.page_count, 3);
        for outcome in &result.strategies {
            let got = outcome.map.get("ABC123-0001");
            assert!(matches!(got, None | Some(5)), "{}: {:?}", outcome.name, got);
        }
        assert_eq!(result.ensemble.merged.get("ABC123-0001"), Some(5));
    }

    #[test]
    fn test_dedicated_pool_matches_sequential() {
        let mut pages = Vec::new();
        for n in 1..=8u32 {
            let tag = format!("AB{:03}-100", n * 100);
            let mut tokens = row(&tag, &n.to_string(), 10.0);
            tokens.extend(row("ZZ999-999", &(n + 10).to_string(), 40.0));
            pages.push(Page::new(n, tokens));
        }
        let document = Document::new(pages);
        let config = ExtractionConfig {
            threads: Some(2),
            ..Default::default()
        };
        let strategies = all_strategies(&config);
        let result = extract_document(&document, &strategies, &config).unwrap();
        for strategy in &strategies {
            let sequential = run_strategy(&document, strategy.as_ref(), &config);
            assert_eq!(result.strategy(strategy.name()), Some(&sequential));
        }
        assert_eq!(result.ensemble.merged.get("ZZ999-999"), Some(11));
    }

    #[test]
    fn test_empty_document() {
        let config = ExtractionConfig::default();
        let strategies: Vec<Box<dyn PairingStrategy>> =
            vec![Box::new(DirectionalNearest::default())];
        let result = extract_document(&Document::new(Vec::new()), &strategies, &config).unwrap();
        assert_eq!(result.strategies.len(), 1);
        assert!(result.strategies[0].map.is_empty());
        assert!(result.ensemble.merged.is_empty());
    }
}
