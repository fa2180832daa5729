use tgw_protocol::mapping::price_repr;

/// Month/adjustment markers in priority order.
const MARKERS: [char; 3] = ['M', 'A', 'B'];

/// Normalized option index: `"{strike:.3}-{tail}"`, where `tail` is the
/// display symbol (spaces removed) from the first occurrence of the first
/// marker present. Falls back to the bare strike when no marker is found.
pub fn option_index(strike: f64, display_symbol: &str) -> String {
    let compact: String = display_symbol.chars().filter(|c| *c != ' ').collect();

    MARKERS
        .iter()
        .find_map(|m| compact.find(*m))
        .map(|pos| format!("{strike:.3}-{}", &compact[pos..]))
        .unwrap_or_else(|| price_repr(strike))
}
