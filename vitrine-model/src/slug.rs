/// Normalize a display label into the slug used for category, subcategory
/// and tag keys.
///
/// Lowercases, then collapses every run of non-alphanumeric characters into
/// a single `-`, with no leading or trailing separator. `"Home & Garden"`
/// and `"home_garden"` both become `"home-garden"`.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }

    out
}
