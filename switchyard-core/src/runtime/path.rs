/// Joins path elements and cleans the result. A trailing slash of the last
/// element is kept; `.` and `..` segments are resolved.
///
/// The result is rooted if the first non-empty element is.
pub fn join_path(elements: &[&str]) -> String {
    let joined = elements
        .iter()
        .filter(|e| !e.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        return String::new();
    }

    let mut path = clean(&joined);

    let trailing = elements.last().is_some_and(|last| last.ends_with('/'));
    if trailing && !path.ends_with('/') {
        path.push('/');
    }
    path
}

fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            s => segments.push(s),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
