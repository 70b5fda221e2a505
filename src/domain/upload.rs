/// Spreadsheet formats accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xls,
    Xlsx,
}

impl FileKind {
    /// Classify by the text after the last `.` of the name, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "xls" => Some(FileKind::Xls),
            "xlsx" => Some(FileKind::Xlsx),
            _ => None,
        }
    }
}

/// Reduce a client supplied filename to a name that is safe to join onto
/// the upload directory. Both `/` and `\` count as separators; only the
/// last component is kept.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let last = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();

    if last.is_empty() || last == "." || last == ".." || last.contains('\0') {
        return None;
    }

    Some(last.to_string())
}
