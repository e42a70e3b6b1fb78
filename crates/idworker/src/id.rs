use core::{fmt, hash::Hash, time::Duration};

/// A bit-packed, time-ordered 64-bit identifier made of four fields:
/// timestamp, datacenter ID, worker ID and sequence.
///
/// Generators are generic over this trait so that alternative layouts can be
/// plugged in. Implementations must place the timestamp in the most
/// significant used bits so that ordering by raw value is ordering by time.
///
/// # Example
///
/// ```
/// use idworker::{IdWorkerId, SnowflakeId};
///
/// let id = IdWorkerId::from_components(1000, 2, 3, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.datacenter_id(), 2);
/// assert_eq!(id.worker_id(), 3);
/// assert_eq!(id.sequence(), 1);
/// ```
pub trait SnowflakeId:
    Sized + Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Returns the timestamp portion of the ID (milliseconds since the epoch).
    fn timestamp(&self) -> u64;

    /// Returns the maximum possible value for the timestamp field.
    fn max_timestamp() -> u64;

    /// Returns the datacenter ID portion of the ID.
    fn datacenter_id(&self) -> u64;

    /// Returns the maximum possible value for the datacenter_id field.
    fn max_datacenter_id() -> u64;

    /// Returns the worker ID portion of the ID.
    fn worker_id(&self) -> u64;

    /// Returns the maximum possible value for the worker_id field.
    fn max_worker_id() -> u64;

    /// Returns the sequence portion of the ID.
    fn sequence(&self) -> u64;

    /// Returns the maximum possible value for the sequence field.
    fn max_sequence() -> u64;

    /// Constructs a new ID from its components.
    fn from_components(timestamp: u64, datacenter_id: u64, worker_id: u64, sequence: u64)
    -> Self;

    /// Converts this type into its raw representation.
    fn to_raw(&self) -> u64;

    /// Converts a raw value into this type.
    fn from_raw(raw: u64) -> Self;

    /// Returns true if the current sequence value can be incremented.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the next sequence value.
    fn next_sequence(&self) -> u64 {
        self.sequence() + 1
    }

    /// Returns a new ID with the sequence incremented.
    fn increment_sequence(&self) -> Self {
        Self::from_components(
            self.timestamp(),
            self.datacenter_id(),
            self.worker_id(),
            self.next_sequence(),
        )
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.datacenter_id(), self.worker_id(), 0)
    }

    /// Returns the absolute wall-clock time of this ID in milliseconds since
    /// 1970-01-01 UTC, given the epoch it was generated against.
    ///
    /// Saturates at `u64::MAX` for epochs too large to represent.
    fn to_unix_millis(&self, epoch: Duration) -> u64 {
        u64::try_from(epoch.as_millis())
            .unwrap_or(u64::MAX)
            .saturating_add(self.timestamp())
    }
}

/// A 64-bit ID using the datacenter/worker layout
///
/// - 1 bit reserved
/// - 41 bits timestamp (ms since [`IDWORKER_EPOCH`] by default)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21              17 16          12 11             0
///              +--------------+----------------+------------------+--------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter ID (5)| worker ID (5)| sequence (12) |
///              +--------------+----------------+------------------+--------------+---------------+
///              |<----------------- MSB ------------- 64 bits ------------ LSB ------------------->|
/// ```
///
/// A 41-bit millisecond timestamp covers roughly 69 years past the epoch.
///
/// [`IDWORKER_EPOCH`]: crate::IDWORKER_EPOCH
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdWorkerId {
    id: u64,
}

impl IdWorkerId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Width of the datacenter ID field.
    pub const DATACENTER_ID_BITS: u32 = 5;

    /// Width of the worker ID field.
    pub const WORKER_ID_BITS: u32 = 5;

    /// Width of the sequence field; 4096 IDs per millisecond.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 5-bit datacenter ID field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 12
    /// through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::DATACENTER_ID_SHIFT + Self::DATACENTER_ID_BITS;

    /// Number of bits to shift the datacenter ID to its correct position (bit
    /// 17).
    pub const DATACENTER_ID_SHIFT: u32 = Self::WORKER_ID_SHIFT + Self::WORKER_ID_BITS;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Packs the four fields into an ID. Out-of-range inputs are truncated to
    /// their field width.
    pub const fn from(timestamp: u64, datacenter_id: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID from the packed ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    fn fields(&self) -> [FieldLayout; 5] {
        [
            FieldLayout {
                name: "reserved",
                bits: 1,
                value: self.id >> 63,
            },
            FieldLayout {
                name: "timestamp",
                bits: Self::TIMESTAMP_BITS,
                value: self.timestamp(),
            },
            FieldLayout {
                name: "datacenter_id",
                bits: Self::DATACENTER_ID_BITS,
                value: self.datacenter_id(),
            },
            FieldLayout {
                name: "worker_id",
                bits: Self::WORKER_ID_BITS,
                value: self.worker_id(),
            },
            FieldLayout {
                name: "sequence",
                bits: Self::SEQUENCE_BITS,
                value: self.sequence(),
            },
        ]
    }
}

impl SnowflakeId for IdWorkerId {
    fn timestamp(&self) -> u64 {
        self.timestamp()
    }

    fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    fn datacenter_id(&self) -> u64 {
        self.datacenter_id()
    }

    fn max_datacenter_id() -> u64 {
        Self::DATACENTER_ID_MASK
    }

    fn worker_id(&self) -> u64 {
        self.worker_id()
    }

    fn max_worker_id() -> u64 {
        Self::WORKER_ID_MASK
    }

    fn sequence(&self) -> u64 {
        self.sequence()
    }

    fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(
            datacenter_id <= Self::DATACENTER_ID_MASK,
            "datacenter_id overflow"
        );
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, datacenter_id, worker_id, sequence)
    }

    fn to_raw(&self) -> u64 {
        self.id
    }

    fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }
}

impl From<IdWorkerId> for u64 {
    fn from(id: IdWorkerId) -> Self {
        id.id
    }
}

impl fmt::Display for IdWorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for IdWorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bit_layout_debug(f, "IdWorkerId", self.id, &self.to_padded_string(), &self.fields())
    }
}

struct FieldLayout {
    name: &'static str,
    bits: u32,
    value: u64,
}

fn write_bit_layout_debug(
    f: &mut fmt::Formatter<'_>,
    type_name: &str,
    raw: u64,
    padded: &str,
    fields: &[FieldLayout],
) -> fmt::Result {
    fn center(s: impl ToString, width: usize) -> String {
        let s = s.to_string();
        let len = s.len();
        if len >= width {
            return s;
        }
        let pad = width - len;
        let left = pad / 2;
        let right = pad - left;
        format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
    }

    fn border(f: &mut fmt::Formatter<'_>, columns: &[usize]) -> fmt::Result {
        write!(f, "        +")?;
        for &w in columns {
            write!(f, "{}+", "-".repeat(w))?;
        }
        writeln!(f)
    }

    // Widest of label, decimal and hex per column, plus padding
    let columns: Vec<usize> = fields
        .iter()
        .map(|field| {
            let label_len = format!("{} ({})", field.name, field.bits).len();
            let dec_len = field.value.to_string().len();
            let hex_len = format!("0x{:x}", field.value).len();
            label_len.max(dec_len).max(hex_len) + 2
        })
        .collect();

    writeln!(f, "{type_name} {{")?;
    writeln!(f, "    raw id     : 0x{raw:016x} ({raw})")?;
    writeln!(f, "    padded     : {padded}")?;
    writeln!(f, "    layout     :")?;

    border(f, &columns)?;

    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(format!("{} ({})", field.name, field.bits), w))?;
    }
    writeln!(f)?;

    border(f, &columns)?;

    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(field.value, w))?;
    }
    writeln!(f)?;

    write!(f, "        |")?;
    for (field, &w) in fields.iter().zip(&columns) {
        write!(f, "{}|", center(format!("0x{:x}", field.value), w))?;
    }
    writeln!(f)?;

    border(f, &columns)?;

    write!(f, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_worker_id_fields_and_bounds() {
        let ts = IdWorkerId::max_timestamp();
        let dc = IdWorkerId::max_datacenter_id();
        let wid = IdWorkerId::max_worker_id();
        let seq = IdWorkerId::max_sequence();

        let id = IdWorkerId::from(ts, dc, wid, seq);
        println!("ID: {:?}", id);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.datacenter_id(), dc);
        assert_eq!(id.worker_id(), wid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(IdWorkerId::from_components(ts, dc, wid, seq), id);
        // reserved bit is never set
        assert_eq!(id.to_raw() >> 63, 0);
    }

    #[test]
    fn layout_matches_shift_formula() {
        let (ts, dc, wid, seq) = (123_456_789_u64, 2_u64, 3_u64, 77_u64);
        let expected = (ts << 22) | (dc << 17) | (wid << 12) | seq;
        assert_eq!(IdWorkerId::from_components(ts, dc, wid, seq).to_raw(), expected);
        assert_eq!(IdWorkerId::TIMESTAMP_SHIFT, 22);
        assert_eq!(IdWorkerId::DATACENTER_ID_SHIFT, 17);
        assert_eq!(IdWorkerId::WORKER_ID_SHIFT, 12);
    }

    #[test]
    fn fields_decode_from_raw() {
        let raw = (5_000_u64 << 22) | (31 << 17) | (1 << 12) | 4095;
        let id = IdWorkerId::from_raw(raw);
        assert_eq!(id.timestamp(), 5_000);
        assert_eq!(id.datacenter_id(), 31);
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.sequence(), 4095);
        assert_eq!(u64::from(id), raw);
    }

    #[test]
    fn ordering_follows_timestamp_then_sequence() {
        let a = IdWorkerId::from_components(10, 31, 31, 4095);
        let b = IdWorkerId::from_components(11, 0, 0, 0);
        let c = IdWorkerId::from_components(11, 0, 0, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn sequence_helpers() {
        let id = IdWorkerId::from_components(7, 1, 2, 0);
        assert!(id.has_sequence_room());
        let next = id.increment_sequence();
        assert_eq!(next.sequence(), 1);
        assert_eq!(next.timestamp(), 7);
        assert_eq!((next.datacenter_id(), next.worker_id()), (1, 2));

        let full = IdWorkerId::from_components(7, 1, 2, IdWorkerId::max_sequence());
        assert!(!full.has_sequence_room());
        let rolled = full.rollover_to_timestamp(8);
        assert_eq!(rolled.timestamp(), 8);
        assert_eq!(rolled.sequence(), 0);
        assert_eq!((rolled.datacenter_id(), rolled.worker_id()), (1, 2));
    }

    #[test]
    fn unix_millis_adds_epoch() {
        let id = IdWorkerId::from_components(1_000, 0, 0, 0);
        let epoch = Duration::from_millis(1_480_166_465_631);
        assert_eq!(id.to_unix_millis(epoch), 1_480_166_466_631);
    }

    #[test]
    fn unix_millis_saturates_on_huge_epoch() {
        let id = IdWorkerId::from_components(1_000, 0, 0, 0);
        assert_eq!(id.to_unix_millis(Duration::from_millis(u64::MAX)), u64::MAX);
        assert_eq!(id.to_unix_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn display_and_padded() {
        let id = IdWorkerId::from_raw(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.to_padded_string(), "00000000000000000042");
    }

    #[test]
    fn debug_renders_every_field() {
        let id = IdWorkerId::from_components(1, 2, 3, 4);
        let out = format!("{id:?}");
        assert!(out.starts_with("IdWorkerId {"));
        for label in [
            "reserved (1)",
            "timestamp (41)",
            "datacenter_id (5)",
            "worker_id (5)",
            "sequence (12)",
        ] {
            assert!(out.contains(label), "missing {label} in {out}");
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_is_transparent() {
        let id = IdWorkerId::from_components(99, 1, 1, 3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: IdWorkerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        let ts = IdWorkerId::max_timestamp() + 1;
        IdWorkerId::from_components(ts, 0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "datacenter_id overflow")]
    fn datacenter_id_overflow_panics() {
        let dc = IdWorkerId::max_datacenter_id() + 1;
        IdWorkerId::from_components(0, dc, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        let wid = IdWorkerId::max_worker_id() + 1;
        IdWorkerId::from_components(0, 0, wid, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        let seq = IdWorkerId::max_sequence() + 1;
        IdWorkerId::from_components(0, 0, 0, seq);
    }
}
