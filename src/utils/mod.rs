pub mod demographics;
pub mod image_processor;

/// Lowercases and replaces every run of non-alphanumeric characters with a
/// single dash, e.g. "Faces of 2024!" -> "faces-of-2024".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
