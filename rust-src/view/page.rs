//! Page model: the named regions a refresh writes into.
//!
//! Every target is optional. A region that is not part of the layout is
//! simply absent and updates aimed at it are skipped.

use std::collections::{HashMap, HashSet};

use crate::config::LayoutSettings;
use crate::models::Period;


pub const SUGGESTIONS: &str = "suggestions";
pub const ALERTS: &str = "alerts";
pub const RECENT_TRANSACTIONS: &str = "recent-transactions";

/// List regions in display order.
pub const LIST_IDS: [&str; 3] = [SUGGESTIONS, ALERTS, RECENT_TRANSACTIONS];


/// Presentation class of a list item: plain, a list-group entry, or a success note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStyle {
    Plain,
    GroupItem,
    Success,
}


/// One rendered line inside a list region.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub text: String,
    pub style: ItemStyle,
}


impl ListItem {
    pub fn new(text: impl Into<String>, style: ItemStyle) -> Self {
        Self { text: text.into(), style }
    }
}


/// Ordered list region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListContainer {
    items: Vec<ListItem>,
}


impl ListContainer {
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every item and replace them with `items`.
    pub fn replace_with(&mut self, items: impl IntoIterator<Item = ListItem>) {
        self.items.clear();
        self.items.extend(items);
    }
}


/// KPI totals shown above the lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryCards {
    pub income: f64,
    pub spending: f64,
    pub savings: f64,
}


/// Control that re-fetches the dashboard with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Filter7,
    Filter30,
    FilterAll,
}


impl Trigger {
    pub const ALL: [Trigger; 3] = [Trigger::Filter7, Trigger::Filter30, Trigger::FilterAll];

    pub fn element_id(&self) -> &'static str {
        match self {
            Self::Filter7 => "filter7",
            Self::Filter30 => "filter30",
            Self::FilterAll => "filterAll",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.element_id() == id)
    }

    pub fn period(&self) -> Period {
        match self {
            Self::Filter7 => Period::seven_days(),
            Self::Filter30 => Period::thirty_days(),
            Self::FilterAll => Period::all(),
        }
    }
}


/// All targets a dashboard refresh may touch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    lists: HashMap<String, ListContainer>,
    has_summary: bool,
    summary: Option<SummaryCards>,
    canvases: HashSet<String>,
    triggers: HashSet<Trigger>,
}


impl Page {
    /// Build a page containing exactly the targets named by the layout.
    pub fn from_layout(layout: &LayoutSettings) -> Self {
        let mut triggers = HashSet::new();
        for id in &layout.triggers {
            match Trigger::from_element_id(id) {
                Some(trigger) => {
                    triggers.insert(trigger);
                }
                None => tracing::warn!(id = %id, "Ignoring unknown trigger in layout"),
            }
        }

        Self {
            lists: layout
                .lists
                .iter()
                .map(|id| (id.clone(), ListContainer::default()))
                .collect(),
            has_summary: layout.summary,
            summary: None,
            canvases: layout.canvases.iter().cloned().collect(),
            triggers,
        }
    }

    /// List region by id, if the page has it.
    pub fn list(&self, id: &str) -> Option<&ListContainer> {
        self.lists.get(id)
    }

    pub fn list_mut(&mut self, id: &str) -> Option<&mut ListContainer> {
        self.lists.get_mut(id)
    }

    pub fn has_canvas(&self, id: &str) -> bool {
        self.canvases.contains(id)
    }

    pub fn has_trigger(&self, trigger: Trigger) -> bool {
        self.triggers.contains(&trigger)
    }

    pub fn has_summary(&self) -> bool {
        self.has_summary
    }

    /// Current KPI cards, if the region exists and has been filled.
    pub fn summary(&self) -> Option<&SummaryCards> {
        self.summary.as_ref()
    }

    /// Replace the KPI cards. No-op when the page has no summary region.
    pub fn set_summary(&mut self, cards: Option<SummaryCards>) {
        if self.has_summary {
            self.summary = cards;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_builds_full_page() {
        let page = Page::from_layout(&LayoutSettings::default());

        for id in LIST_IDS {
            assert!(page.list(id).is_some());
        }
        assert!(page.has_canvas("spendingChart7d"));
        assert!(page.has_trigger(Trigger::Filter30));
        assert!(page.has_summary());
        assert!(page.summary().is_none());
    }

    #[test]
    fn test_absent_targets() {
        let layout = LayoutSettings {
            lists: vec![ALERTS.to_string()],
            canvases: vec![],
            triggers: vec!["filterAll".to_string(), "filter90".to_string()],
            summary: false,
        };
        let mut page = Page::from_layout(&layout);

        assert!(page.list(SUGGESTIONS).is_none());
        assert!(page.list_mut(RECENT_TRANSACTIONS).is_none());
        assert!(!page.has_canvas("spendingChart7d"));
        assert!(page.has_trigger(Trigger::FilterAll));
        assert!(!page.has_trigger(Trigger::Filter7));

        page.set_summary(Some(SummaryCards { income: 1.0, spending: 1.0, savings: 0.0 }));
        assert!(page.summary().is_none());
    }

    #[test]
    fn test_trigger_periods() {
        assert_eq!(Trigger::Filter7.period().as_str(), "7");
        assert_eq!(Trigger::Filter30.period().as_str(), "30");
        assert_eq!(Trigger::FilterAll.period().as_str(), "all");
        assert_eq!(Trigger::from_element_id("filter30"), Some(Trigger::Filter30));
        assert_eq!(Trigger::from_element_id("filterall"), None);
    }

    #[test]
    fn test_replace_with_discards_previous_items() {
        let mut list = ListContainer::default();
        list.replace_with(vec![ListItem::new("old", ItemStyle::Plain)]);
        list.replace_with(vec![
            ListItem::new("a", ItemStyle::Plain),
            ListItem::new("b", ItemStyle::Success),
        ]);

        assert_eq!(list.items().len(), 2);
        assert_eq!(list.items()[0].text, "a");
        assert_eq!(list.items()[1].style, ItemStyle::Success);
    }
}
