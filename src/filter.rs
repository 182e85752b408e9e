use crate::error::CheckError;
use crate::models::volume::Named;
use regex::Regex;

/// Which records a run cares about. Name lists win over full-name lists,
/// which win over the include/exclude rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub lv:            Option<Vec<String>>,
    pub full_name:     Option<Vec<String>>,
    pub include:       Option<Vec<String>>,
    pub exclude:       Option<Vec<String>>,
    pub exclude_regex: Option<String>,
}

impl Selection {
    fn has_group_rules(&self) -> bool {
        self.include.is_some() || self.exclude.is_some() || self.exclude_regex.is_some()
    }
}

/// Select the records matching `sel`, keeping input order.
///
/// An empty input is an error rather than an empty selection: LVM always
/// reports something when it is reachable with the right permissions.
pub fn filter<'a, T: Named>(records: &'a [T], sel: &Selection) -> Result<Vec<&'a T>, CheckError> {
    if records.is_empty() {
        return Err(CheckError::NoVolumes);
    }

    if let Some(names) = &sel.lv {
        return Ok(records.iter().filter(|r| names.iter().any(|n| n == r.name())).collect());
    }
    if let Some(names) = &sel.full_name {
        return Ok(records.iter().filter(|r| names.iter().any(|n| n == r.full_name())).collect());
    }
    if !sel.has_group_rules() {
        return Ok(records.iter().collect());
    }

    let exclude_re = sel.exclude_regex.as_deref().map(Regex::new).transpose()?;
    Ok(records.iter()
        .filter(|r| {
            let name = r.name();
            if sel.exclude.as_ref().is_some_and(|ex| ex.iter().any(|n| n == name)) { return false; }
            if exclude_re.as_ref().is_some_and(|re| re.is_match(name)) { return false; }
            if let Some(inc) = &sel.include {
                return inc.iter().any(|n| n == name);
            }
            true
        })
        .collect())
}
