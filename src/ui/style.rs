/// Compile-time layout tokens; not user-overridable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub spacing_24: i32,
    pub card_radius: u16,
    pub control_radius: u16,
    pub control_size: i32,
    pub icon_size: i32,
    pub monogram_size: i32,
    pub swatch_width: i32,
    pub swatch_height: i32,
    pub chart_height: i32,
    pub motion_standard_ms: u32,
    pub toast_duration_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    spacing_24: 24,
    card_radius: 12,
    control_radius: 8,
    control_size: 36,
    icon_size: 20,
    monogram_size: 32,
    swatch_width: 72,
    swatch_height: 40,
    chart_height: 256,
    motion_standard_ms: 300,
    toast_duration_ms: 2_000,
};

#[cfg(test)]
mod tests {
    use super::LAYOUT_TOKENS;
    use crate::layout::PANEL_RAIL_WIDTH;

    #[test]
    fn layout_tokens_match_component_dimensions() {
        let tokens = LAYOUT_TOKENS;
        assert_eq!(tokens.monogram_size, 32);
        assert_eq!(tokens.chart_height, 256);
        assert!(tokens.control_size < PANEL_RAIL_WIDTH);
    }

    #[test]
    fn layout_tokens_match_motion_tokens() {
        let tokens = LAYOUT_TOKENS;
        assert_eq!(tokens.motion_standard_ms, 300);
        assert_eq!(tokens.toast_duration_ms, 2_000);
    }
}
