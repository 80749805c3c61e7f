pub const EXPERIMENT_NAME_WIDTH: usize = 20;
pub const INT_WIDTH: usize = 4;
pub const FLOAT_WIDTH: usize = 8;

pub const RECORD_COUNT_OFFSET: usize = EXPERIMENT_NAME_WIDTH;
pub const COLUMN_COUNT_OFFSET: usize = RECORD_COUNT_OFFSET + INT_WIDTH;
pub const LEGACY_SWEEP_OFFSET: usize = COLUMN_COUNT_OFFSET + INT_WIDTH;
pub const LEGACY_TIMESTAMP_OFFSET: usize = LEGACY_SWEEP_OFFSET + INT_WIDTH;
pub const CHANNEL_TABLE_OFFSET: usize = LEGACY_TIMESTAMP_OFFSET + INT_WIDTH;

pub const CHANNEL_SLOTS: usize = 32;
pub const CHANNEL_NAME_WIDTH: usize = 13;
pub const CHANNEL_UNITS_WIDTH: usize = 13;
pub const CHANNEL_COMMENT_WIDTH: usize = 50;

/// Offsets inside one channel descriptor slot.
pub const SLOT_NAME_OFFSET: usize = 0;
pub const SLOT_UNITS_OFFSET: usize = SLOT_NAME_OFFSET + CHANNEL_NAME_WIDTH;
pub const SLOT_GAIN_OFFSET: usize = SLOT_UNITS_OFFSET + CHANNEL_UNITS_WIDTH;
pub const SLOT_COMMENT_OFFSET: usize = SLOT_GAIN_OFFSET + INT_WIDTH;
pub const SLOT_SAMPLE_COUNT_OFFSET: usize = SLOT_COMMENT_OFFSET + CHANNEL_COMMENT_WIDTH;
pub const SLOT_SIZE: usize = SLOT_SAMPLE_COUNT_OFFSET + INT_WIDTH;

pub const CHANNEL_TABLE_SIZE: usize = CHANNEL_SLOTS * SLOT_SIZE;
pub const PAYLOAD_OFFSET: usize = CHANNEL_TABLE_OFFSET + CHANNEL_TABLE_SIZE;

/// Name prefix marking an unused channel slot.
pub const SENTINEL_PREFIX: &str = "no_val";

/// Byte offset of the first byte of `slot` in the channel table.
pub const fn slot_offset(slot: usize) -> usize {
    CHANNEL_TABLE_OFFSET + slot * SLOT_SIZE
}
