// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::model::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPreset {
    Essential,
    Standard,
    All,
    Custom,
}

impl ColumnPreset {
    pub const ALL: [Self; 4] = [Self::Essential, Self::Standard, Self::All, Self::Custom];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Standard => "standard",
            Self::All => "all",
            Self::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "essential" => Some(Self::Essential),
            "standard" => Some(Self::Standard),
            "all" => Some(Self::All),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Essential-preset rule: identity, the record's display handle, its pipeline
/// status, and the creation stamp.
fn is_essential_column(field: &str) -> bool {
    field == "id"
        || field == "name"
        || field == "title"
        || field == "status"
        || field == "created_at"
        || field.ends_with("_name")
}

/// Per-category column visibility. Field introspection comes from the
/// category's first record; the last seen field list is cached so an empty
/// category degrades to the cache (or to nothing) instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVisibility {
    preset: ColumnPreset,
    toggles: BTreeMap<String, bool>,
    known_fields: Vec<String>,
}

impl ColumnVisibility {
    pub const fn new() -> Self {
        Self {
            preset: ColumnPreset::All,
            toggles: BTreeMap::new(),
            known_fields: Vec::new(),
        }
    }

    pub const fn preset(&self) -> ColumnPreset {
        self.preset
    }

    /// Recomputes toggles for a preset from the category's live field list.
    /// `Custom` retains the current toggles untouched. An empty `fields`
    /// falls back to the cached field list.
    pub fn apply_preset(&mut self, category: Category, fields: &[String], preset: ColumnPreset) {
        if !fields.is_empty() {
            self.known_fields = fields.to_vec();
        }
        self.preset = preset;
        if preset == ColumnPreset::Custom {
            return;
        }

        let standard = category.standard_columns();
        let known = self.known_fields.clone();
        self.toggles = known
            .into_iter()
            .map(|field| {
                let visible = match preset {
                    ColumnPreset::Essential => is_essential_column(&field),
                    ColumnPreset::Standard => standard.contains(&field.as_str()),
                    ColumnPreset::All => true,
                    ColumnPreset::Custom => unreachable!("custom handled above"),
                };
                (field, visible)
            })
            .collect();
    }

    /// Flips one field and pins the preset to `Custom`.
    pub fn toggle(&mut self, field: &str) {
        let entry = self.toggles.entry(field.to_owned()).or_insert(true);
        *entry = !*entry;
        self.preset = ColumnPreset::Custom;
    }

    pub fn is_visible(&self, field: &str) -> bool {
        self.toggles.get(field).copied().unwrap_or(true)
    }

    /// Projects `fields` (in display order) down to the visible ones.
    pub fn visible_columns(&self, fields: &[String]) -> Vec<String> {
        fields
            .iter()
            .filter(|field| self.is_visible(field))
            .cloned()
            .collect()
    }

    pub fn known_fields(&self) -> &[String] {
        &self.known_fields
    }
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnPreset, ColumnVisibility};
    use crate::model::Category;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn essential_preset_keeps_id_name_and_status() {
        let mut visibility = ColumnVisibility::new();
        let all = fields(&["id", "name", "email", "phone", "status"]);
        visibility.apply_preset(Category::Clients, &all, ColumnPreset::Essential);

        assert_eq!(
            visibility.visible_columns(&all),
            fields(&["id", "name", "status"])
        );
    }

    #[test]
    fn essential_preset_matches_name_suffix_and_created_at() {
        let mut visibility = ColumnVisibility::new();
        let all = fields(&["id", "facility_id", "facility_name", "notes", "created_at"]);
        visibility.apply_preset(Category::Favorites, &all, ColumnPreset::Essential);

        assert_eq!(
            visibility.visible_columns(&all),
            fields(&["id", "facility_name", "created_at"])
        );
    }

    #[test]
    fn standard_preset_uses_curated_category_columns() {
        let mut visibility = ColumnVisibility::new();
        let all = fields(&[
            "id",
            "name",
            "kind",
            "address",
            "city",
            "capacity",
            "available_beds",
            "medicare_approved",
            "price_range",
            "created_at",
        ]);
        visibility.apply_preset(Category::Facilities, &all, ColumnPreset::Standard);

        assert_eq!(
            visibility.visible_columns(&all),
            fields(&["id", "name", "kind", "city", "available_beds"])
        );
    }

    #[test]
    fn all_preset_shows_every_field() {
        let mut visibility = ColumnVisibility::new();
        let all = fields(&["id", "name", "status"]);
        visibility.apply_preset(Category::Clients, &all, ColumnPreset::All);

        assert_eq!(visibility.visible_columns(&all), all);
    }

    #[test]
    fn toggle_flips_field_and_forces_custom() {
        let mut visibility = ColumnVisibility::new();
        let all = fields(&["id", "name", "status"]);
        visibility.apply_preset(Category::Clients, &all, ColumnPreset::All);

        visibility.toggle("name");
        assert_eq!(visibility.preset(), ColumnPreset::Custom);
        assert_eq!(visibility.visible_columns(&all), fields(&["id", "status"]));

        visibility.toggle("name");
        assert_eq!(visibility.visible_columns(&all), all);
        assert_eq!(visibility.preset(), ColumnPreset::Custom);
    }

    #[test]
    fn custom_preset_retains_current_toggles() {
        let mut visibility = ColumnVisibility::new();
        let all = fields(&["id", "name", "status"]);
        visibility.apply_preset(Category::Clients, &all, ColumnPreset::All);
        visibility.toggle("status");

        visibility.apply_preset(Category::Clients, &all, ColumnPreset::Custom);
        assert_eq!(visibility.visible_columns(&all), fields(&["id", "name"]));
    }

    #[test]
    fn empty_category_falls_back_to_cached_field_list() {
        let mut visibility = ColumnVisibility::new();
        let all = fields(&["id", "name", "status"]);
        visibility.apply_preset(Category::Clients, &all, ColumnPreset::All);

        visibility.apply_preset(Category::Clients, &[], ColumnPreset::Essential);
        assert_eq!(visibility.known_fields(), all.as_slice());
        assert_eq!(
            visibility.visible_columns(&all),
            fields(&["id", "name", "status"])
        );
    }

    #[test]
    fn empty_category_without_cache_yields_no_columns() {
        let mut visibility = ColumnVisibility::new();
        visibility.apply_preset(Category::Clients, &[], ColumnPreset::Essential);
        assert!(visibility.visible_columns(&[]).is_empty());
    }
}
