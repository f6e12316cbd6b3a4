/// Frame tags, as found in byte 0 of every frame exchanged with the modem
pub const TAG_HEADER: u8 = 0x00;
pub const TAG_DATA: u8 = 0x01;
pub const TAG_LOST: u8 = 0x02;
pub const TAG_EOT: u8 = 0x03;

/// Flag byte (byte 1) markers
pub const DMR_IDLE_RX: u8 = 0x80;
pub const DMR_SYNC_DATA: u8 = 0x40;
pub const DMR_SYNC_AUDIO: u8 = 0x20;

/// Low nibble of the flag byte when DMR_SYNC_DATA is set
pub const DT_MASK: u8 = 0x0F;
pub const DT_VOICE_PI_HEADER: u8 = 0x00;
pub const DT_VOICE_LC_HEADER: u8 = 0x01;
pub const DT_TERMINATOR_WITH_LC: u8 = 0x02;
pub const DT_CSBK: u8 = 0x03;
pub const DT_MBC_HEADER: u8 = 0x04;
pub const DT_MBC_CONTINUATION: u8 = 0x05;
pub const DT_DATA_HEADER: u8 = 0x06;
pub const DT_RATE_12_DATA: u8 = 0x07;
pub const DT_RATE_34_DATA: u8 = 0x08;
pub const DT_IDLE: u8 = 0x09;
pub const DT_RATE_1_DATA: u8 = 0x0A;

/// Pseudo data types used on the network side for voice bursts
pub const DT_VOICE_SYNC: u8 = 0xF0;
pub const DT_VOICE: u8 = 0xF1;

/// Length of one over-the-air burst
pub const DMR_FRAME_LENGTH_BYTES: usize = 33;

/// Tag byte, flag byte and burst
pub const DMR_MODEM_FRAME_LENGTH: usize = 2 + DMR_FRAME_LENGTH_BYTES;

/// Modem frame followed by two bytes of raw RSSI
pub const DMR_MODEM_FRAME_LENGTH_RSSI: usize = DMR_MODEM_FRAME_LENGTH + 2;

/// Target base station id in a BS_Dwn_Act meaning "any base station"
pub const BS_ID_ANY: u32 = 0xFF_FFFF;

/// Duration of one TDMA frame (two timeslots), in milliseconds
pub const DMR_FRAME_PERIOD_MS: u64 = 60;
