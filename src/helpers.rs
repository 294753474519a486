use chrono::{DateTime, Datelike, Utc};

/// Renders an mtime the way `ls -l` does: month, day and time for entries
/// from the reference year, month, day and year otherwise. chrono's `%b` is
/// plain English whatever the process locale is set to.
pub fn format_list_time(mtime: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if mtime.year() == now.year() {
        mtime.format("%b %e %H:%M").to_string()
    } else {
        mtime.format("%b %e %Y").to_string()
    }
}

/// Resolves a command argument against a working directory. The bare
/// literal `//` collapses to `/`; absolute arguments stand alone.
pub fn resolve_path(cwd: &str, arg: &str) -> String {
    let arg = if arg == "//" { "/" } else { arg };
    if arg.is_empty() {
        cwd.to_string()
    } else if arg.starts_with('/') {
        arg.to_string()
    } else if cwd.ends_with('/') {
        format!("{}{}", cwd, arg)
    } else {
        format!("{}/{}", cwd, arg)
    }
}
