//! Reducing a corpus into per-function and per-category time budgets.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::info;

use crate::categorize::{CategoryCache, Categorizer};
use crate::error::{Error, Level, Result, Scope};
use crate::model::{CategoryAttribution, Corpus, FunctionAttribution};

/// Function name → attribution, ordered by descending time.
pub type FunctionStats = IndexMap<String, FunctionAttribution>;

/// Category → attribution, ordered by descending time.
pub type CategoryStats = IndexMap<String, CategoryAttribution>;

/// Total runtime of the instances in `corpus` that can be time-weighted.
pub fn total_time(corpus: &Corpus) -> f64 {
    corpus
        .iter()
        .filter_map(|(_, stats)| stats.weighted_runtime())
        .sum()
}

/// Charge every sample's share of its instance runtime to the sample's
/// function, summed over `corpus`.
///
/// Each function's category is looked up once, the first time the function
/// is seen. Functions with equal time keep first-seen order.
pub fn aggregate_functions<C: Categorizer + ?Sized>(
    corpus: &Corpus,
    categorizer: &C,
    normalize: bool,
    scope: Scope,
) -> Result<FunctionStats> {
    let total = total_time(corpus);
    info!(%scope, instances = corpus.len(), total_secs = total, "aggregating functions");
    if total <= 0.0 {
        return Err(Error::ZeroTotal {
            scope,
            level: Level::Function,
        });
    }

    let mut cache = CategoryCache::new(categorizer);
    let mut functions = FunctionStats::new();
    for (_, stats) in corpus.iter() {
        let Some(runtime) = stats.weighted_runtime() else {
            continue;
        };
        for entry in stats.entries() {
            let time = entry.weight(normalize) * runtime;
            match functions.entry(entry.symbol.clone()) {
                Entry::Occupied(mut slot) => slot.get_mut().time += time,
                Entry::Vacant(slot) => {
                    let category = cache.resolve(&entry.symbol).to_string();
                    slot.insert(FunctionAttribution {
                        time,
                        pct: 0.0,
                        category,
                    });
                }
            }
        }
    }

    for attribution in functions.values_mut() {
        attribution.pct = attribution.time / total;
    }
    functions.sort_by(|_, a, _, b| b.time.total_cmp(&a.time));
    Ok(functions)
}

/// Roll function attributions up into their categories.
///
/// Zero-time functions are ignored, so a category made only of them does not
/// appear. Percentages are relative to the summed category time.
pub fn aggregate_categories(functions: &FunctionStats, scope: Scope) -> Result<CategoryStats> {
    let mut categories = CategoryStats::new();
    for attribution in functions.values() {
        if attribution.time == 0.0 {
            continue;
        }
        categories
            .entry(attribution.category.clone())
            .or_insert(CategoryAttribution {
                time: 0.0,
                pct: 0.0,
            })
            .time += attribution.time;
    }

    let total: f64 = categories.values().map(|c| c.time).sum();
    info!(%scope, categories = categories.len(), total_secs = total, "aggregating categories");
    if total <= 0.0 {
        return Err(Error::ZeroTotal {
            scope,
            level: Level::Category,
        });
    }

    for attribution in categories.values_mut() {
        attribution.pct = attribution.time / total;
    }
    categories.sort_by(|_, a, _, b| b.time.total_cmp(&a.time));
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::{StaticCategorizer, UNCATEGORIZED};
    use crate::model::{InstanceStats, SampleEntry};
    use crate::normalize::normalize as normalize_entries;

    fn instance(runtime: Option<f64>, samples: &[(&str, f64)]) -> InstanceStats {
        let mut entries: Vec<_> = samples
            .iter()
            .map(|(symbol, pct)| SampleEntry::new(*pct, *pct, "c2d", "c2d", *symbol))
            .collect();
        normalize_entries(&mut entries);
        InstanceStats {
            entries: Some(entries),
            runtime_secs: runtime,
        }
    }

    fn corpus(instances: Vec<(&str, InstanceStats)>) -> Corpus {
        Corpus::new(
            instances.into_iter().map(|(n, s)| (n.to_string(), s)),
            3600.0,
        )
    }

    fn table() -> StaticCategorizer {
        [("foo", "search"), ("bar", "search"), ("baz", "io")]
            .into_iter()
            .collect()
    }

    #[test]
    fn normalized_example() {
        let corpus = corpus(vec![("a", instance(Some(100.0), &[("foo", 10.0), ("bar", 5.0)]))]);
        let functions = aggregate_functions(&corpus, &table(), true, Scope::Full).unwrap();
        assert!((functions["foo"].time - 66.666_666_666).abs() < 1e-6);
        assert!((functions["bar"].time - 33.333_333_333).abs() < 1e-6);
        assert!((functions["foo"].pct - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(functions["foo"].category, "search");
    }

    #[test]
    fn raw_percentages_when_not_normalizing() {
        let corpus = corpus(vec![("a", instance(Some(100.0), &[("foo", 10.0), ("bar", 5.0)]))]);
        let functions = aggregate_functions(&corpus, &table(), false, Scope::Full).unwrap();
        assert!((functions["foo"].time - 10.0).abs() < 1e-9);
        assert!((functions["bar"].pct - 0.05).abs() < 1e-9);
    }

    #[test]
    fn sums_across_instances_and_orders_by_time() {
        let corpus = corpus(vec![
            ("a", instance(Some(10.0), &[("foo", 50.0), ("bar", 50.0)])),
            ("b", instance(Some(30.0), &[("bar", 20.0), ("baz", 10.0), ("qux", 10.0)])),
        ]);
        let functions = aggregate_functions(&corpus, &table(), true, Scope::Full).unwrap();
        let order: Vec<_> = functions.keys().map(String::as_str).collect();
        assert_eq!(order, ["bar", "baz", "qux", "foo"]);
        assert!((functions["bar"].time - 20.0).abs() < 1e-9);
        assert_eq!(functions["qux"].category, UNCATEGORIZED);

        let pct_sum: f64 = functions.values().map(|f| f.pct).sum();
        assert!((pct_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn equal_times_keep_first_seen_order() {
        let corpus = corpus(vec![
            ("a", instance(Some(20.0), &[("zeta", 50.0), ("alpha", 50.0)])),
        ]);
        let functions = aggregate_functions(&corpus, &table(), true, Scope::Full).unwrap();
        let order: Vec<_> = functions.keys().map(String::as_str).collect();
        assert_eq!(order, ["zeta", "alpha"]);
    }

    #[test]
    fn unweighable_instances_are_skipped() {
        let no_report = InstanceStats {
            entries: None,
            runtime_secs: Some(500.0),
        };
        let corpus = corpus(vec![
            ("a", instance(Some(10.0), &[("foo", 1.0)])),
            ("zero", instance(Some(0.0), &[("bar", 1.0)])),
            ("nolog", instance(None, &[("bar", 1.0)])),
            ("noreport", no_report),
        ]);
        assert_eq!(total_time(&corpus), 10.0);
        let functions = aggregate_functions(&corpus, &table(), true, Scope::Full).unwrap();
        assert_eq!(functions.len(), 1);
        assert!((functions["foo"].pct - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_is_fatal() {
        let corpus = corpus(vec![("a", instance(Some(0.0), &[("foo", 1.0)]))]);
        let err = aggregate_functions(&corpus, &table(), true, Scope::Completed).unwrap_err();
        assert!(matches!(
            err,
            Error::ZeroTotal {
                scope: Scope::Completed,
                level: Level::Function
            }
        ));
        assert!(aggregate_functions(&Corpus::default(), &table(), true, Scope::Full).is_err());
    }

    #[test]
    fn categories_roll_up_functions() {
        let corpus = corpus(vec![
            ("a", instance(Some(10.0), &[("foo", 50.0), ("bar", 50.0)])),
            ("b", instance(Some(30.0), &[("bar", 20.0), ("baz", 10.0), ("qux", 10.0)])),
        ]);
        let functions = aggregate_functions(&corpus, &table(), true, Scope::Full).unwrap();
        let categories = aggregate_categories(&functions, Scope::Full).unwrap();

        let order: Vec<_> = categories.keys().map(String::as_str).collect();
        assert_eq!(order, ["search", "io", UNCATEGORIZED]);
        assert!((categories["search"].time - 25.0).abs() < 1e-9);
        assert!((categories["io"].pct - 7.5 / 40.0).abs() < 1e-9);

        let pct_sum: f64 = categories.values().map(|c| c.pct).sum();
        assert!((pct_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_time_categories_are_dropped_and_all_zero_is_fatal() {
        let mut functions = FunctionStats::new();
        functions.insert(
            "idle".into(),
            FunctionAttribution {
                time: 0.0,
                pct: 0.0,
                category: "waiting".into(),
            },
        );
        let err = aggregate_categories(&functions, Scope::TimedOut).unwrap_err();
        assert!(matches!(
            err,
            Error::ZeroTotal {
                scope: Scope::TimedOut,
                level: Level::Category
            }
        ));

        functions.insert(
            "work".into(),
            FunctionAttribution {
                time: 3.0,
                pct: 1.0,
                category: "busy".into(),
            },
        );
        let categories = aggregate_categories(&functions, Scope::TimedOut).unwrap();
        assert_eq!(categories.len(), 1);
        assert!(!categories.contains_key("waiting"));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let corpus = corpus(vec![
            ("a", instance(Some(7.0), &[("foo", 3.0), ("bar", 3.0), ("baz", 3.0)])),
            ("b", instance(Some(7.0), &[("baz", 3.0), ("foo", 3.0), ("bar", 3.0)])),
        ]);
        let first = aggregate_functions(&corpus, &table(), true, Scope::Full).unwrap();
        let second = aggregate_functions(&corpus, &table(), true, Scope::Full).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
