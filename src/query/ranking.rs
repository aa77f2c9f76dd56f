use super::filter::FilteredView;
use super::usage::{UNKNOWN_UNIT, UsageQuantity};
use serde::Serialize;
use std::collections::BTreeMap;

/// One bar of the top-materials chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMaterial {
    pub material: f64,
    pub usage: UsageQuantity,
    /// Row index within the filtered view
    pub row: usize,
}

impl RankedMaterial {
    /// Identifier as shown on the chart axis.
    pub fn label(&self) -> String {
        format_material(self.material)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopMaterials {
    pub entries: Vec<RankedMaterial>,
    pub unit_label: String,
}

impl TopMaterials {
    /// Number of bars actually returned, which may be below the limit.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn title(&self) -> String {
        format!("Top {} Materials by Usage", self.count())
    }
}

/// Ranks the view by usage magnitude, largest first, keeping at most `limit`.
///
/// The sort is stable, so rows with equal magnitude keep their view order.
/// Unparsed usage counts as zero and sinks below every positive value.
pub fn rank_top_materials(view: &FilteredView, limit: usize) -> TopMaterials {
    let mut entries: Vec<RankedMaterial> = view
        .materials()
        .iter()
        .zip(view.usage())
        .enumerate()
        .map(|(row, (&material, usage))| RankedMaterial {
            material,
            usage: usage.clone(),
            row,
        })
        .collect();

    entries.sort_by(|a, b| b.usage.magnitude().total_cmp(&a.usage.magnitude()));
    entries.truncate(limit);

    let unit_label = modal_unit(&entries);
    TopMaterials {
        entries,
        unit_label,
    }
}

/// Most frequent unit among the entries. Ties go to the alphabetically first
/// unit, which is also what a sorted mode would report.
fn modal_unit(entries: &[RankedMaterial]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.usage.unit()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (unit, count) in counts {
        if best.is_none_or(|(_, n)| count > n) {
            best = Some((unit, count));
        }
    }
    best.map_or_else(|| UNKNOWN_UNIT.to_owned(), |(unit, _)| unit.to_owned())
}

/// Renders an identifier with `f64`'s `Display`, which already prints whole
/// numbers without a fractional part (`10.0` as `10`).
pub fn format_material(material: f64) -> String {
    material.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::columns;
    use crate::error::Result;
    use crate::query::filter::filter_inventory;
    use crate::query::identifiers::IdentifierSet;
    use polars::prelude::*;

    fn view(materials: &[f64], usage: &[&str]) -> Result<FilteredView> {
        let df = df!(
            columns::MATERIAL => materials,
            columns::FORECASTED_USAGE => usage
        )?;
        filter_inventory(&df, &IdentifierSet::new(materials.iter().copied()))
    }

    fn order(top: &TopMaterials) -> Vec<f64> {
        top.entries.iter().map(|e| e.material).collect()
    }

    #[test]
    fn test_descending_by_magnitude() -> Result<()> {
        let view = view(&[10.0, 20.0, 30.0], &["100 KG", "50 KG", "200 KG"])?;
        let top = rank_top_materials(&view, 5);
        assert_eq!(order(&top), vec![30.0, 10.0, 20.0]);
        assert_eq!(top.count(), 3);
        assert_eq!(top.title(), "Top 3 Materials by Usage");
        assert_eq!(top.unit_label, "KG");
        Ok(())
    }

    #[test]
    fn test_never_more_than_limit() -> Result<()> {
        let materials: Vec<f64> = (1..=8).map(f64::from).collect();
        let usage: Vec<String> = (1..=8).map(|i| format!("{i} EA")).collect();
        let usage: Vec<&str> = usage.iter().map(String::as_str).collect();
        let top = rank_top_materials(&view(&materials, &usage)?, 5);
        assert_eq!(top.count(), 5);
        assert_eq!(order(&top), vec![8.0, 7.0, 6.0, 5.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_ties_keep_view_order() -> Result<()> {
        let view = view(&[4.0, 1.0, 3.0, 2.0], &["5 KG", "9 KG", "5 KG", "5 KG"])?;
        let top = rank_top_materials(&view, 5);
        assert_eq!(order(&top), vec![1.0, 4.0, 3.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_malformed_usage_ranks_last() -> Result<()> {
        let view = view(&[1.0, 2.0, 3.0], &["N/A", "5 KG", "1 KG"])?;
        let top = rank_top_materials(&view, 5);
        assert_eq!(order(&top), vec![2.0, 3.0, 1.0]);
        let last = top.entries.last().map(|e| e.usage.clone());
        assert_eq!(last, Some(UsageQuantity::Unparsed));
        Ok(())
    }

    #[test]
    fn test_unit_mode_tie_breaks_alphabetically() -> Result<()> {
        let view = view(&[1.0, 2.0, 3.0, 4.0], &["4 L", "3 KG", "2 L", "1 KG"])?;
        assert_eq!(rank_top_materials(&view, 5).unit_label, "KG");
        Ok(())
    }

    #[test]
    fn test_empty_view() {
        let top = rank_top_materials(&FilteredView::empty(&DataFrame::empty()), 5);
        assert!(top.is_empty());
        assert_eq!(top.unit_label, UNKNOWN_UNIT);
    }

    #[test]
    fn test_material_labels() {
        assert_eq!(format_material(100_234.0), "100234");
        assert_eq!(format_material(12.5), "12.5");
    }
}
