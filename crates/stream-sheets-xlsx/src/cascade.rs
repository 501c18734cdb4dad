//! Style cascade: a cellXfs index merged through its parent style and the
//! numFmt/font/fill/border tables into one [`ResolvedStyle`]

use std::sync::{Arc, PoisonError, RwLock};

use ahash::AHashMap;
use stream_sheets_core::style::merge_group;
use stream_sheets_core::{CellValue, RawStyleTable, ResolvedStyle, StyleGroup};

/// Resolves style indices of one workbook, caching each result.
///
/// The cache may be populated from several threads; two threads resolving
/// the same index compute the same record and the first insert wins.
#[derive(Debug, Default)]
pub struct StyleCascade {
    table: Arc<RawStyleTable>,
    cache: RwLock<AHashMap<u32, Arc<ResolvedStyle>>>,
}

impl StyleCascade {
    pub fn new(table: Arc<RawStyleTable>) -> Self {
        Self {
            table,
            cache: RwLock::new(AHashMap::new()),
        }
    }

    /// The tables the cascade draws from
    pub fn table(&self) -> &RawStyleTable {
        &self.table
    }

    /// Resolved formatting for a cellXfs index.
    ///
    /// Every index other than 0 starts from the resolution of index 0. An
    /// index with no cellXfs entry yields that base record unchanged.
    pub fn resolve(&self, idx: u32) -> Arc<ResolvedStyle> {
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&idx)
        {
            return Arc::clone(hit);
        }

        let style = Arc::new(self.compute(idx));
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(idx).or_insert(style))
    }

    /// Resolved formatting collapsed into a single property map
    pub fn resolve_flat(&self, idx: u32) -> StyleGroup {
        self.resolve(idx).flatten()
    }

    /// Number of cached indices
    pub fn cached(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn compute(&self, idx: u32) -> ResolvedStyle {
        let mut style = if idx == 0 {
            ResolvedStyle::default()
        } else {
            (*self.resolve(0)).clone()
        };

        let Some(entry) = self.table.cell_xfs.get(idx as usize) else {
            return style;
        };
        let mut xf = entry.clone();

        // parent named style; its fields override the cell's own
        if let Some(parent_id) = xf.xf_id.filter(|&id| id != 0 || idx == 0) {
            if let Some(parent) = self.table.cell_style_xfs.get(parent_id as usize) {
                xf.merge(parent);
            }
        }

        merge_group(&mut style.format, &xf.alignment);
        if let Some(group) = xf.num_fmt_id.and_then(|id| self.table.num_fmt_group(id)) {
            merge_group(&mut style.format, &group);
        }
        if let Some(font) = xf.font_id.and_then(|id| self.table.fonts.get(id as usize)) {
            merge_group(&mut style.font, font);
        }
        if let Some(fill) = xf.fill_id.and_then(|id| self.table.fills.get(id as usize)) {
            merge_group(&mut style.fill, fill);
        }
        if let Some(border) = xf.border_id.and_then(|id| self.table.borders.get(id as usize)) {
            merge_group(&mut style.border, border);
        }

        style
    }
}

/// A cell value paired with its resolved formatting
#[derive(Debug, Clone, PartialEq)]
pub struct StyledCell {
    pub value: CellValue,
    pub style: Arc<ResolvedStyle>,
}
