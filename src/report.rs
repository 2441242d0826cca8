//! Owned/wanted reconciliation across wanted lists.
//!
//! Wanted lists double as an inventory: lists named with the `[LOOSE]`
//! prefix hold parts already on hand, lists named with `[IGNORE]` are left
//! out, and every other list is demand. The report matches demand against
//! the loose parts by (item number, color).

use crate::error::ApiError;
use crate::user::wanted::{WantedItem, WantedList};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

pub const LOOSE_PREFIX: &str = "[LOOSE]";
pub const IGNORE_PREFIX: &str = "[IGNORE]";

#[async_trait]
pub trait WantedListSource: Send + Sync {
    async fn wanted_lists(&self) -> Result<Vec<WantedList>, ApiError>;

    // Every item of the list, across all pages
    async fn wanted_items(&self, list_id: i64) -> Result<Vec<WantedItem>, ApiError>;

    fn max_concurrent_requests(&self) -> usize {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListRole {
    Wanted,
    Loose,
    Ignored,
}

pub fn classify_list(name: &str) -> ListRole {
    let name = name.trim_start();
    if name.starts_with(IGNORE_PREFIX) {
        ListRole::Ignored
    } else if name.starts_with(LOOSE_PREFIX) {
        ListRole::Loose
    } else {
        ListRole::Wanted
    }
}

// Ordered by item number, then color
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PartKey {
    pub item_no: String,
    pub color_id: i64,
}

impl PartKey {
    pub fn of(item: &WantedItem) -> Self {
        Self {
            item_no: item.item_no.clone(),
            color_id: item.color_id,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tally {
    pub quantity: i64,
    pub item_name: String,
    pub color_name: String,
    pub lists: BTreeSet<String>,
}

impl Tally {
    fn add(&mut self, item: &WantedItem, quantity: i64, list_name: &str) {
        self.quantity += quantity;
        if self.item_name.is_empty() {
            self.item_name = item.item_name.clone();
        }
        if self.color_name.is_empty() {
            self.color_name = item.color_name.clone();
        }
        self.lists.insert(list_name.to_string());
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Inventories {
    // Remaining quantity still wanted
    pub wanted: BTreeMap<PartKey, Tally>,
    // Quantity on hand in loose lists
    pub loose: BTreeMap<PartKey, Tally>,
    pub lists_wanted: usize,
    pub lists_loose: usize,
    pub lists_ignored: usize,
}

pub fn build_inventories(lists: &[(WantedList, Vec<WantedItem>)]) -> Inventories {
    let mut inventories = Inventories::default();

    for (list, items) in lists {
        let role = classify_list(&list.name);
        let (map, quantity_of): (_, fn(&WantedItem) -> i64) = match role {
            ListRole::Ignored => {
                inventories.lists_ignored += 1;
                continue;
            }
            ListRole::Wanted => {
                inventories.lists_wanted += 1;
                (&mut inventories.wanted, WantedItem::remaining_qty)
            }
            ListRole::Loose => {
                inventories.lists_loose += 1;
                (&mut inventories.loose, |item: &WantedItem| item.wanted_qty.max(0))
            }
        };

        for item in items {
            let quantity = quantity_of(item);
            if quantity == 0 {
                continue;
            }
            map.entry(PartKey::of(item))
                .or_default()
                .add(item, quantity, &list.name);
        }
    }

    inventories
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedWantedPart {
    pub item_no: String,
    pub item_name: String,
    pub color_id: i64,
    pub color_name: String,
    pub wanted: i64,
    pub available: i64,
    // min(wanted, available)
    pub usable: i64,
    pub wanted_lists: Vec<String>,
    pub loose_lists: Vec<String>,
}

// Parts both wanted and on hand, sorted by item number then color
pub fn match_parts(inventories: &Inventories) -> Vec<OwnedWantedPart> {
    inventories
        .wanted
        .iter()
        .filter_map(|(key, wanted)| {
            let loose = inventories.loose.get(key)?;
            Some(OwnedWantedPart {
                item_no: key.item_no.clone(),
                item_name: wanted.item_name.clone(),
                color_id: key.color_id,
                color_name: wanted.color_name.clone(),
                wanted: wanted.quantity,
                available: loose.quantity,
                usable: wanted.quantity.min(loose.quantity),
                wanted_lists: wanted.lists.iter().cloned().collect(),
                loose_lists: loose.lists.iter().cloned().collect(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedWantedReport {
    pub lists_wanted: usize,
    pub lists_loose: usize,
    pub lists_ignored: usize,
    pub parts: Vec<OwnedWantedPart>,
}

impl OwnedWantedReport {
    pub fn from_lists(lists: &[(WantedList, Vec<WantedItem>)]) -> Self {
        let inventories = build_inventories(lists);
        Self {
            lists_wanted: inventories.lists_wanted,
            lists_loose: inventories.lists_loose,
            lists_ignored: inventories.lists_ignored,
            parts: match_parts(&inventories),
        }
    }

    pub fn total_usable(&self) -> i64 {
        self.parts.iter().map(|p| p.usable).sum()
    }
}

impl fmt::Display for OwnedWantedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} wanted lists, {} loose lists, {} ignored",
            self.lists_wanted, self.lists_loose, self.lists_ignored
        )?;
        if self.parts.is_empty() {
            return writeln!(f, "No wanted parts are available loose");
        }

        writeln!(
            f,
            "{:<12} {:>5} {:>7} {:>7} {:>7}  {}",
            "Item", "Color", "Wanted", "Loose", "Usable", "Description"
        )?;
        for part in &self.parts {
            writeln!(
                f,
                "{:<12} {:>5} {:>7} {:>7} {:>7}  {} ({}) [{}]",
                part.item_no,
                part.color_id,
                part.wanted,
                part.available,
                part.usable,
                part.item_name,
                part.color_name,
                part.loose_lists.join(", ")
            )?;
        }
        writeln!(
            f,
            "{} lots, {} parts usable",
            self.parts.len(),
            self.total_usable()
        )
    }
}

/// Fetch every wanted list from `source` and match wanted parts against the
/// loose lists. Ignored lists are never fetched.
pub async fn report_owned_wanted_parts<S>(source: &S) -> Result<OwnedWantedReport, ApiError>
where
    S: WantedListSource + ?Sized,
{
    let lists = source.wanted_lists().await?;
    let (ignored, fetch): (Vec<_>, Vec<_>) = lists
        .into_iter()
        .partition(|list| classify_list(&list.name) == ListRole::Ignored);
    for list in &ignored {
        debug!(id = list.id, name = %list.name, "skipping ignored wanted list");
    }

    let concurrency = source.max_concurrent_requests().max(1);
    let mut fetched: Vec<(WantedList, Vec<WantedItem>)> = stream::iter(fetch)
        .map(|list| async move {
            let items = source.wanted_items(list.id).await?;
            Ok::<_, ApiError>((list, items))
        })
        .buffer_unordered(concurrency)
        .try_collect()
        .await?;
    fetched.sort_by_key(|(list, _)| list.id);

    let mut report = OwnedWantedReport::from_lists(&fetched);
    report.lists_ignored = ignored.len();
    info!(
        lists = fetched.len(),
        ignored = ignored.len(),
        lots = report.parts.len(),
        usable = report.total_usable(),
        "built owned/wanted report"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use test_case::test_case;

    fn item(no: &str, color: i64, qty: i64, filled: i64) -> WantedItem {
        WantedItem {
            item_no: no.to_string(),
            item_name: format!("Item {}", no),
            color_id: color,
            color_name: format!("Color {}", color),
            wanted_qty: qty,
            wanted_qty_filled: filled,
            ..WantedItem::default()
        }
    }

    fn list(id: i64, name: &str) -> WantedList {
        WantedList {
            id,
            name: name.to_string(),
        }
    }

    struct StaticSource {
        lists: Vec<WantedList>,
        items: HashMap<i64, Vec<WantedItem>>,
        fetched: Mutex<Vec<i64>>,
    }

    impl StaticSource {
        fn new(lists: Vec<(WantedList, Vec<WantedItem>)>) -> Self {
            Self {
                lists: lists.iter().map(|(l, _)| l.clone()).collect(),
                items: lists.into_iter().map(|(l, i)| (l.id, i)).collect(),
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WantedListSource for StaticSource {
        async fn wanted_lists(&self) -> Result<Vec<WantedList>, ApiError> {
            Ok(self.lists.clone())
        }

        async fn wanted_items(&self, list_id: i64) -> Result<Vec<WantedItem>, ApiError> {
            self.fetched.lock().push(list_id);
            self.items
                .get(&list_id)
                .cloned()
                .ok_or_else(|| ApiError::ReturnCode {
                    code: 404,
                    message: format!("no list {}", list_id),
                })
        }

        fn max_concurrent_requests(&self) -> usize {
            3
        }
    }

    #[test_case("Castle MOC", ListRole::Wanted)]
    #[test_case("[LOOSE] Bin 4", ListRole::Loose)]
    #[test_case("[IGNORE] Old", ListRole::Ignored)]
    #[test_case("  [LOOSE] indented", ListRole::Loose)]
    #[test_case("Not [LOOSE]", ListRole::Wanted)]
    #[test_case("[loose] lowercase", ListRole::Wanted)]
    fn test_classify_list(name: &str, expected: ListRole) {
        assert_eq!(classify_list(name), expected);
    }

    #[test]
    fn test_demand_and_supply_are_summed_per_key() {
        let lists = vec![
            (list(1, "MOC A"), vec![item("3001", 11, 4, 1), item("3023", 5, 2, 0)]),
            (list(2, "MOC B"), vec![item("3001", 11, 2, 0)]),
            (list(3, "[LOOSE] Bin"), vec![item("3001", 11, 1, 0)]),
            (list(4, "[LOOSE] Box"), vec![item("3001", 11, 5, 5)]),
        ];
        let inventories = build_inventories(&lists);

        let key = PartKey {
            item_no: "3001".to_string(),
            color_id: 11,
        };
        // 3 remaining from A, 2 from B
        assert_eq!(inventories.wanted[&key].quantity, 5);
        // loose lists count wantedQty, not the remainder
        assert_eq!(inventories.loose[&key].quantity, 6);
        assert_eq!(inventories.loose[&key].lists.len(), 2);
        assert_eq!(inventories.lists_wanted, 2);
        assert_eq!(inventories.lists_loose, 2);
    }

    #[test]
    fn test_match_parts() {
        let lists = vec![
            (
                list(1, "MOC"),
                vec![
                    item("3023", 5, 2, 0),
                    item("3001", 11, 10, 0),
                    item("3001", 1, 3, 0),
                    item("3069b", 1, 4, 4),
                ],
            ),
            (
                list(2, "[LOOSE] Bin"),
                vec![item("3001", 11, 4, 0), item("3001", 1, 7, 0), item("3069b", 1, 9, 0)],
            ),
            (list(3, "[IGNORE] Wishlist"), vec![item("3023", 5, 100, 0)]),
        ];
        let report = OwnedWantedReport::from_lists(&lists);

        // 3023 has no loose supply, 3069b is already filled
        assert_eq!(report.parts.len(), 2);
        assert_eq!(report.parts[0].item_no, "3001");
        assert_eq!(report.parts[0].color_id, 1);
        assert_eq!(report.parts[0].usable, 3);
        assert_eq!(report.parts[1].color_id, 11);
        assert_eq!(report.parts[1].wanted, 10);
        assert_eq!(report.parts[1].available, 4);
        assert_eq!(report.parts[1].usable, 4);
        assert_eq!(report.parts[1].wanted_lists, vec!["MOC".to_string()]);
        assert_eq!(report.parts[1].loose_lists, vec!["[LOOSE] Bin".to_string()]);
        assert_eq!(report.total_usable(), 7);
        assert_eq!(report.lists_ignored, 1);
    }

    #[test]
    fn test_overfilled_items_add_no_demand() {
        let lists = vec![
            (list(1, "MOC"), vec![item("3001", 11, 2, 6)]),
            (list(2, "[LOOSE] Bin"), vec![item("3001", 11, 4, 0)]),
        ];
        let report = OwnedWantedReport::from_lists(&lists);
        assert!(report.parts.is_empty());
    }

    #[tokio::test]
    async fn test_report_skips_ignored_lists() {
        let source = StaticSource::new(vec![
            (list(1, "MOC"), vec![item("3001", 11, 4, 0)]),
            (list(2, "[LOOSE] Bin"), vec![item("3001", 11, 10, 0)]),
            (list(3, "[IGNORE] Old"), vec![item("3001", 11, 50, 0)]),
        ]);

        let report = report_owned_wanted_parts(&source).await.unwrap();
        assert_eq!(report.parts.len(), 1);
        assert_eq!(report.parts[0].usable, 4);
        assert_eq!(report.lists_ignored, 1);

        let mut fetched = source.fetched.lock().clone();
        fetched.sort();
        assert_eq!(fetched, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_report_propagates_fetch_errors() {
        let mut source = StaticSource::new(vec![(list(1, "MOC"), vec![])]);
        source.lists.push(list(9, "Missing"));

        let err = report_owned_wanted_parts(&source).await.unwrap_err();
        assert!(matches!(err, ApiError::ReturnCode { code: 404, .. }));
    }

    #[test]
    fn test_report_renders_table_and_json() {
        let source = StaticSource::new(vec![
            (list(1, "MOC"), vec![item("3001", 11, 4, 0)]),
            (list(2, "[LOOSE] Bin"), vec![item("3001", 11, 1, 0)]),
        ]);
        let report = tokio_test::block_on(report_owned_wanted_parts(&source)).unwrap();

        let text = report.to_string();
        assert!(text.starts_with("1 wanted lists, 1 loose lists, 0 ignored"));
        assert!(text.contains("Item 3001 (Color 11) [[LOOSE] Bin]"));
        assert!(text.ends_with("1 lots, 1 parts usable\n"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["parts"][0]["usable"], 1);
        assert_eq!(json["parts"][0]["item_no"], "3001");
    }

    #[test]
    fn test_empty_report_text() {
        let report = OwnedWantedReport::from_lists(&[]);
        assert!(report.to_string().contains("No wanted parts are available loose"));
    }
}
