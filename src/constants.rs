/// Hard cap on generated schedule slots. Malformed frequency/deadline
/// combinations truncate here instead of looping.
pub const MAX_SCHEDULE_SLOTS: usize = 1000;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Calendar-date storage format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category assigned to both legs of an internal transfer
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Sub-account label used when none is given
pub const DEFAULT_ACCOUNT: &str = "Main";
