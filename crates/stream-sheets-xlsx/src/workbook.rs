//! Opened xlsx workbook

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use log::debug;
use stream_sheets_core::date::timestamp;
use stream_sheets_core::{
    Area, Cell, ColumnTable, Error, RawStyleTable, ReadOptions, ResolvedStyle, Row, StyleGroup,
    WorkbookSettings,
};
use zip::ZipArchive;

use crate::cascade::StyleCascade;
use crate::catalog::{Catalog, SheetEntry};
use crate::cursor::RowCursor;
use crate::drawings::{drawing_part_for, read_images, SheetImage};
use crate::error::{XlsxError, XlsxResult};
use crate::part::PartCursor;
use crate::sheet::SheetReader;

/// Per-sheet state kept between reads
#[derive(Debug, Default)]
pub(crate) struct SheetState {
    pub(crate) area: Area,
    pub(crate) images: Option<Vec<SheetImage>>,
}

/// An xlsx workbook opened for streaming reads.
///
/// Opening reads the workbook catalog (sheets, shared strings, styles);
/// worksheet rows are only parsed when a sheet is read. Every read of a
/// sheet starts a fresh pass over its part.
///
/// ```no_run
/// use stream_sheets_xlsx::Workbook;
/// use stream_sheets_core::ReadOptions;
///
/// let mut workbook = Workbook::open("report.xlsx")?;
/// let mut sheet = workbook.sheet("Summary")?;
/// sheet.set_read_area("B2:D20", false)?;
/// for row in sheet.rows(ReadOptions::new())? {
///     let (row_num, cells) = row?;
///     println!("{}: {} cells", row_num, cells.len());
/// }
/// # Ok::<(), stream_sheets_xlsx::XlsxError>(())
/// ```
pub struct Workbook<R: Read + Seek> {
    pub(crate) archive: ZipArchive<R>,
    pub(crate) catalog: Catalog,
    pub(crate) cascade: StyleCascade,
    pub(crate) sheets: Vec<SheetState>,
    selected: usize,
}

impl Workbook<BufReader<File>> {
    /// Open a workbook file
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let path = path.as_ref();
        debug!("opening workbook {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> Workbook<R> {
    /// Open a workbook from any seekable source
    pub fn from_reader(reader: R) -> XlsxResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let catalog = Catalog::load(&mut archive)?;
        let cascade = StyleCascade::new(Arc::clone(&catalog.styles));
        let sheets = catalog.sheets.iter().map(|_| SheetState::default()).collect();

        Ok(Workbook {
            archive,
            catalog,
            cascade,
            sheets,
            selected: 0,
        })
    }

    /// Sheets in workbook order
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.catalog.sheets
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.catalog.sheets.iter().map(|s| s.name.as_str())
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.catalog.sheets.len()
    }

    /// Sheet by name, compared case-insensitively
    pub fn sheet(&mut self, name: &str) -> XlsxResult<SheetReader<'_, R>> {
        let index = self.index_of(name)?;
        Ok(SheetReader::new(self, index))
    }

    /// Sheet by its `sheetId`
    pub fn sheet_by_id(&mut self, id: u32) -> XlsxResult<SheetReader<'_, R>> {
        let index = self.index_of_id(id)?;
        Ok(SheetReader::new(self, index))
    }

    /// First sheet of the workbook
    pub fn first_sheet(&mut self) -> XlsxResult<SheetReader<'_, R>> {
        self.sheet_at(0)
    }

    /// The sheet workbook-level reads use (the first one unless selected)
    pub fn selected_sheet(&mut self) -> XlsxResult<SheetReader<'_, R>> {
        self.sheet_at(self.selected)
    }

    /// Make the named sheet the one workbook-level reads use
    pub fn select_sheet(&mut self, name: &str) -> XlsxResult<SheetReader<'_, R>> {
        self.selected = self.index_of(name)?;
        self.sheet_at(self.selected)
    }

    /// Make the sheet with `sheetId` the one workbook-level reads use
    pub fn select_sheet_by_id(&mut self, id: u32) -> XlsxResult<SheetReader<'_, R>> {
        self.selected = self.index_of_id(id)?;
        self.sheet_at(self.selected)
    }

    /// Go back to reading the first sheet
    pub fn select_first_sheet(&mut self) -> XlsxResult<SheetReader<'_, R>> {
        self.selected = 0;
        self.sheet_at(0)
    }

    /// Rows of the selected sheet
    pub fn read_rows(&mut self, options: ReadOptions) -> XlsxResult<Vec<(u32, Row)>> {
        self.selected_sheet()?.read_rows(options)
    }

    /// Columns of the selected sheet
    pub fn read_columns(&mut self, options: ReadOptions) -> XlsxResult<ColumnTable> {
        self.selected_sheet()?.read_columns(options)
    }

    /// Cells of the selected sheet keyed by address
    pub fn read_cells(&mut self, options: ReadOptions) -> XlsxResult<Vec<(String, Cell)>> {
        self.selected_sheet()?.read_cells(options)
    }

    pub fn settings(&self) -> &WorkbookSettings {
        &self.catalog.settings
    }

    /// Render date cells as text with a `strftime` pattern, or go back to
    /// epoch seconds with `None`
    pub fn set_date_format(&mut self, pattern: Option<&str>) {
        self.catalog.settings.date_format = pattern.map(str::to_string);
    }

    pub fn date_format(&self) -> Option<&str> {
        self.catalog.settings.date_format.as_deref()
    }

    /// Epoch seconds for a serial number or date literal, in this
    /// workbook's date system
    pub fn timestamp(&self, raw: &str) -> Option<i64> {
        timestamp(raw, self.catalog.settings.date_system)
    }

    /// Raw tables of `xl/styles.xml`
    pub fn read_styles(&self) -> &RawStyleTable {
        self.cascade.table()
    }

    /// Formatting for a cellXfs index, cascaded through its parent style
    pub fn complete_style(&self, idx: u32) -> Arc<ResolvedStyle> {
        self.cascade.resolve(idx)
    }

    /// [`complete_style`](Self::complete_style) collapsed into one map
    pub fn complete_style_flat(&self, idx: u32) -> StyleGroup {
        self.cascade.resolve_flat(idx)
    }

    /// Every part of the package
    pub fn file_list(&self) -> &[String] {
        &self.catalog.files
    }

    /// Shared string by index
    pub fn shared_string(&self, index: usize) -> Option<&str> {
        self.catalog.shared_string(index)
    }

    /// Whether the package holds any drawing part
    pub fn has_drawings(&self) -> bool {
        self.catalog
            .files
            .iter()
            .any(|f| f.starts_with("xl/drawings/drawing"))
    }

    /// Whether any sheet has an anchored picture
    pub fn has_images(&mut self) -> XlsxResult<bool> {
        Ok(self.count_images()? > 0)
    }

    /// Pictures across all sheets
    pub fn count_images(&mut self) -> XlsxResult<usize> {
        if !self.has_drawings() {
            return Ok(0);
        }
        let mut total = 0;
        for index in 0..self.sheets.len() {
            total += self.images(index)?.len();
        }
        Ok(total)
    }

    /// Pictures of every sheet, by sheet name
    pub fn image_list(&mut self) -> XlsxResult<Vec<(String, Vec<SheetImage>)>> {
        let mut list = Vec::new();
        if !self.has_drawings() {
            return Ok(list);
        }
        for index in 0..self.sheets.len() {
            let images = self.images(index)?.to_vec();
            list.push((self.catalog.sheets[index].name.clone(), images));
        }
        Ok(list)
    }

    fn sheet_at(&mut self, index: usize) -> XlsxResult<SheetReader<'_, R>> {
        if index >= self.catalog.sheets.len() {
            return Err(XlsxError::InvalidFormat("workbook has no sheets".into()));
        }
        Ok(SheetReader::new(self, index))
    }

    fn index_of(&self, name: &str) -> XlsxResult<usize> {
        let wanted = name.to_lowercase();
        self.catalog
            .sheets
            .iter()
            .position(|s| s.name.to_lowercase() == wanted)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()).into())
    }

    fn index_of_id(&self, id: u32) -> XlsxResult<usize> {
        self.catalog
            .sheets
            .iter()
            .position(|s| s.sheet_id == id)
            .ok_or_else(|| Error::SheetIdNotFound(id).into())
    }

    /// Open a row cursor over a sheet
    pub(crate) fn cursor(
        &mut self,
        index: usize,
        area: Area,
        options: ReadOptions,
    ) -> XlsxResult<RowCursor<'_>> {
        let part = PartCursor::open(&mut self.archive, &self.catalog.sheets[index].path)?;
        Ok(RowCursor::new(part, &self.catalog, area, options))
    }

    /// Open a sheet's part for a one-off scan
    pub(crate) fn sheet_part(&mut self, index: usize) -> XlsxResult<PartCursor<'_>> {
        PartCursor::open(&mut self.archive, &self.catalog.sheets[index].path)
    }

    pub(crate) fn drawing_part(&mut self, index: usize) -> XlsxResult<Option<String>> {
        drawing_part_for(&mut self.archive, &self.catalog, &self.catalog.sheets[index].path)
    }

    /// Pictures of a sheet, read on first use
    pub(crate) fn images(&mut self, index: usize) -> XlsxResult<&[SheetImage]> {
        if self.sheets[index].images.is_none() {
            let images = match self.drawing_part(index)? {
                Some(drawing) => read_images(&mut self.archive, &self.catalog, &drawing)?,
                None => Vec::new(),
            };
            self.sheets[index].images = Some(images);
        }
        Ok(self.sheets[index].images.as_deref().unwrap_or_default())
    }

    /// Bytes of a part, `None` when the package lacks it
    pub(crate) fn part_bytes(&mut self, path: &str) -> XlsxResult<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

impl<R: Read + Seek> std::fmt::Debug for Workbook<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("sheets", &self.catalog.sheets)
            .field("selected", &self.selected)
            .field("settings", &self.catalog.settings)
            .finish_non_exhaustive()
    }
}
