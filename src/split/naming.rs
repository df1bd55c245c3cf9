use std::collections::HashSet;

/// Truncates a sheet name to at most `limit` characters.
///
/// Counts characters rather than bytes so multi-byte names are never cut in
/// the middle of a code point. Excel rejects names that start or end with an
/// apostrophe, so any left at either end after the cut are dropped.
pub fn truncate_sheet_name(raw: &str, limit: usize) -> String {
    let truncated: String = raw.chars().take(limit).collect();
    truncated.trim_matches('\'').to_string()
}

/// Comparison key for sheet names. Excel treats `Lab` and `LAB` as the same
/// sheet.
pub fn sheet_name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Hands out unique output sheet names within one workbook, suffixing
/// `_1`, `_2`, ... when a truncated name is already taken.
#[derive(Debug)]
pub(crate) struct SheetNameRegistry {
    used: HashSet<String>,
    limit: usize,
}

impl SheetNameRegistry {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            used: HashSet::new(),
            limit,
        }
    }

    /// Returns a name not yet handed out, or `None` once no suffix fits
    /// within the limit.
    pub(crate) fn assign(&mut self, raw: &str) -> Option<String> {
        let base = truncate_sheet_name(raw, self.limit);
        if self.used.insert(sheet_name_key(&base)) {
            return Some(base);
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let suffix_len = suffix.chars().count();
            if suffix_len > self.limit {
                return None;
            }
            let prefix = truncate_sheet_name(&base, self.limit - suffix_len);
            let candidate = format!("{prefix}{suffix}");
            if self.used.insert(sheet_name_key(&candidate)) {
                return Some(candidate);
            }
            counter += 1;
        }
    }
}
