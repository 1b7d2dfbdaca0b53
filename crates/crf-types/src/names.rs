//! Word tables for deriving canonical solid names.

/// Adjective for an n-gon ("triangular", "square", ...).
pub fn polygon_adjective(sides: usize) -> &'static str {
    match sides {
        2 => "digonal",
        3 => "triangular",
        4 => "square",
        5 => "pentagonal",
        6 => "hexagonal",
        7 => "heptagonal",
        8 => "octagonal",
        9 => "enneagonal",
        10 => "decagonal",
        _ => panic!("no adjective for a {sides}-gon"),
    }
}

/// Multiplicity prefix for repeated modifications ("bi", "tri").
pub fn count_prefix(count: usize) -> &'static str {
    match count {
        1 => "",
        2 => "bi",
        3 => "tri",
        _ => panic!("no prefix for count {count}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_adjectives() {
        assert_eq!(polygon_adjective(4), "square");
        assert_eq!(polygon_adjective(10), "decagonal");
    }

    #[test]
    fn test_count_prefixes() {
        assert_eq!(count_prefix(1), "");
        assert_eq!(count_prefix(3), "tri");
    }
}
