//! List state behind every admin table: source rows, the derived view and
//! the checkbox selection.
//!
//! The selection is always a subset of the current view. Changing filters or
//! sort recomputes the view and drops selected ids that fell out of it.

use std::collections::BTreeSet;

use crate::list_query::{query, FilterCriteria, Listable, SortSpec};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Flip one row. Ids outside `view` are ignored.
    pub fn toggle<T: Listable>(&mut self, view: &[T], id: &str) {
        if self.ids.remove(id) {
            return;
        }
        if view.iter().any(|item| item.id() == id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Select every visible row, or clear when all of them already are.
    pub fn toggle_all<T: Listable>(&mut self, view: &[T]) {
        if !view.is_empty() && view.iter().all(|item| self.ids.contains(item.id())) {
            self.ids.clear();
        } else {
            self.select_all(view);
        }
    }

    pub fn select_all<T: Listable>(&mut self, view: &[T]) {
        self.ids = view.iter().map(|item| item.id().to_string()).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn retain_visible<T: Listable>(&mut self, view: &[T]) {
        self.ids
            .retain(|id| view.iter().any(|item| item.id() == id.as_str()));
    }

    pub(crate) fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }
}

/// One admin table. Owns the rows fetched from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminList<T> {
    items: Vec<T>,
    criteria: FilterCriteria,
    sort: Option<SortSpec>,
    view: Vec<T>,
    selection: Selection,
}

impl<T> Default for AdminList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: None,
            view: Vec::new(),
            selection: Selection::default(),
        }
    }
}

impl<T: Listable + Clone> AdminList<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut list = Self {
            items,
            ..Self::default()
        };
        list.refresh();
        list
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Rows after filter and sort.
    pub fn view(&self) -> &[T] {
        &self.view
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.refresh();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    pub fn set_filter(&mut self, field: &str, value: &str) {
        self.criteria.set_field(field, value);
        self.refresh();
    }

    pub fn set_search(&mut self, search: &str) {
        self.criteria.search = search.to_string();
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.refresh();
    }

    /// Header-click behaviour: same field flips direction, a new field starts
    /// ascending.
    pub fn sort_by_column(&mut self, field: &str) {
        let next = match &self.sort {
            Some(current) if current.field == field => SortSpec {
                field: current.field.clone(),
                direction: current.direction.toggled(),
            },
            _ => SortSpec::asc(field),
        };
        self.set_sort(Some(next));
    }

    pub fn toggle_selected(&mut self, id: &str) {
        self.selection.toggle(&self.view, id);
    }

    pub fn toggle_select_all(&mut self) {
        self.selection.toggle_all(&self.view);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.view);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub(crate) fn deselect(&mut self, id: &str) {
        self.selection.remove(id);
    }

    /// Apply `change` to every row whose id is in `ids`. Returns how many rows
    /// were touched.
    pub fn patch<F>(&mut self, ids: &[String], mut change: F) -> usize
    where
        F: FnMut(&mut T),
    {
        let mut touched = 0;
        for item in self.items.iter_mut() {
            if ids.iter().any(|id| id == item.id()) {
                change(item);
                touched += 1;
            }
        }
        self.refresh();
        touched
    }

    /// Insert a new row or replace the one with the same id.
    pub fn upsert(&mut self, item: T) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.insert(0, item),
        }
        self.refresh();
    }

    pub fn remove_ids(&mut self, ids: &[String]) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !ids.iter().any(|id| id == item.id()));
        self.refresh();
        before - self.items.len()
    }

    fn refresh(&mut self) {
        self.view = query(&self.items, &self.criteria, self.sort.as_ref());
        self.selection.retain_visible(&self.view);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        list_query::SortDirection,
        models::{Product, PRODUCT_INACTIVE},
    };

    fn product(id: &str, name: &str, active: bool) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: 10.0,
            stock: 3,
            category: "accessories".to_string(),
            is_active: active,
            sale_price: None,
            specifications: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn list() -> AdminList<Product> {
        AdminList::new(vec![
            product("p1", "Regulator", true),
            product("p2", "Hose", false),
            product("p3", "Burner", true),
        ])
    }

    #[test]
    fn toggling_an_invisible_row_is_ignored() {
        let mut list = list();
        list.set_filter("status", PRODUCT_INACTIVE);
        list.toggle_selected("p1");
        assert!(list.selection().is_empty());
        list.toggle_selected("p2");
        assert_eq!(list.selection().ids(), vec!["p2".to_string()]);
    }

    #[test]
    fn filtering_prunes_the_selection() {
        let mut list = list();
        list.select_all();
        assert_eq!(list.selection().len(), 3);
        list.set_search("hose");
        assert_eq!(list.selection().ids(), vec!["p2".to_string()]);
        list.set_search("");
        assert_eq!(list.selection().len(), 1);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let mut list = list();
        list.toggle_select_all();
        assert_eq!(list.selection().len(), 3);
        list.toggle_select_all();
        assert!(list.selection().is_empty());
    }

    #[test]
    fn column_click_flips_direction() {
        let mut list = list();
        list.sort_by_column("name");
        assert_eq!(list.view()[0].id, "p3");
        list.sort_by_column("name");
        assert_eq!(list.sort().map(|s| s.direction), Some(SortDirection::Desc));
        assert_eq!(list.view()[0].id, "p1");
    }

    #[test]
    fn remove_ids_updates_view_and_selection() {
        let mut list = list();
        list.select_all();
        let removed = list.remove_ids(&["p1".to_string(), "p3".to_string()]);
        assert_eq!(removed, 2);
        assert_eq!(list.view().len(), 1);
        assert_eq!(list.selection().ids(), vec!["p2".to_string()]);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut list = list();
        list.upsert(product("p2", "Hose 2m", true));
        assert_eq!(list.items().len(), 3);
        assert_eq!(list.get("p2").map(|p| p.name.as_str()), Some("Hose 2m"));
        list.upsert(product("p4", "Valve", true));
        assert_eq!(list.items()[0].id, "p4");
    }

    #[test]
    fn source_rows_survive_filtering() {
        let mut list = list();
        list.set_filter("status", "active");
        assert_eq!(list.view().len(), 2);
        assert_eq!(list.items().len(), 3);
    }
}
