/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 20;
/// Hard cap so a single request cannot pull the whole collection.
pub const MAX_LIMIT: i64 = 100;

/// Escapes user-supplied text before it enters a `$regex` filter.
/// Raw input in a regex is an injection/ReDoS surface.
pub fn escape_regex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
            | '\\' | '/' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Normalizes pagination params: page >= 1, limit in 1..=MAX_LIMIT.
/// Returns (page, limit, skip).
pub fn page_params(page: Option<i64>, limit: Option<i64>) -> (i64, i64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let skip = ((page - 1) * limit) as u64;
    (page, limit, skip)
}

/// Total page count for pagination metadata.
pub fn total_pages(total: u64, limit: i64) -> u64 {
    let limit = limit.max(1) as u64;
    total.div_ceil(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_regex_passthrough() {
        assert_eq!(escape_regex("Mumbai"), "Mumbai");
        assert_eq!(escape_regex("New Delhi"), "New Delhi");
    }

    #[test]
    fn test_escape_regex_metacharacters() {
        assert_eq!(escape_regex("a.b"), "a\\.b");
        assert_eq!(escape_regex("(evil)+"), "\\(evil\\)\\+");
        assert_eq!(escape_regex("x|y"), "x\\|y");
        assert_eq!(escape_regex("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_page_params_defaults() {
        assert_eq!(page_params(None, None), (1, 20, 0));
    }

    #[test]
    fn test_page_params_clamping() {
        // page below 1 is normalized, limit is capped
        assert_eq!(page_params(Some(0), Some(500)), (1, 100, 0));
        assert_eq!(page_params(Some(-3), Some(0)), (1, 1, 0));
        // skip accounts for prior pages
        assert_eq!(page_params(Some(3), Some(20)), (3, 20, 40));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
    }
}
