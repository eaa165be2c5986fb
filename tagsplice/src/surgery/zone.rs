use crate::error::Result;
use crate::macros::surgery_err;

/// A named byte range of the original file that may be replaced
///
/// A zone with an `original_size` of `0` is an insertion point: it marks where a tag that
/// doesn't exist yet would be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
	pub(crate) name: String,
	pub(crate) offset: u64,
	pub(crate) original_size: u64,
	pub(crate) required_when_empty: bool,
}

impl Zone {
	/// Create a new `Zone`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::surgery::Zone;
	///
	/// let zone = Zone::new("ape", 1000, 0);
	/// assert!(zone.is_insertion_point());
	/// ```
	pub fn new(name: impl Into<String>, offset: u64, original_size: u64) -> Self {
		Self {
			name: name.into(),
			offset,
			original_size,
			required_when_empty: false,
		}
	}

	/// Mark the zone as one that must keep a placeholder when given empty content
	///
	/// Removing such a zone keeps its original bytes.
	pub fn required_when_empty(mut self, required_when_empty: bool) -> Self {
		self.required_when_empty = required_when_empty;
		self
	}

	/// The zone's name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The zone's offset in the original file
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// The zone's size in the original file
	pub fn original_size(&self) -> u64 {
		self.original_size
	}

	/// The first offset after the zone
	pub fn end(&self) -> u64 {
		self.offset + self.original_size
	}

	/// Whether the zone is empty in the original file
	pub fn is_insertion_point(&self) -> bool {
		self.original_size == 0
	}

	/// See [`Zone::required_when_empty`]
	pub fn is_required_when_empty(&self) -> bool {
		self.required_when_empty
	}

	// Insertion points may sit at the boundary of another zone, but never inside of one
	fn overlaps(&self, other: &Zone) -> bool {
		match (self.is_insertion_point(), other.is_insertion_point()) {
			(true, true) => false,
			(true, false) => self.offset > other.offset && self.offset < other.end(),
			(false, true) => other.offset > self.offset && other.offset < self.end(),
			(false, false) => self.offset < other.end() && other.offset < self.end(),
		}
	}
}

/// An ordered collection of non-overlapping [`Zone`]s
///
/// Registration order is kept, and breaks ties between insertion points sharing an offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRegistry {
	zones: Vec<Zone>,
}

impl ZoneRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a zone, replacing any zone with the same name
	///
	/// # Errors
	///
	/// * `offset + original_size` overflows
	/// * The zone overlaps a zone registered under a different name
	pub fn add(&mut self, zone: Zone) -> Result<()> {
		if zone.offset.checked_add(zone.original_size).is_none() {
			surgery_err!(@ZONE zone.name, "zone end overflows a u64");
		}

		if let Some(other) = self
			.zones
			.iter()
			.find(|other| other.name != zone.name && zone.overlaps(other))
		{
			log::debug!(
				"Zone \"{}\" ({}..{}) overlaps zone \"{}\" ({}..{})",
				zone.name,
				zone.offset,
				zone.end(),
				other.name,
				other.offset,
				other.end()
			);
			surgery_err!(@ZONE zone.name, "zone overlaps an existing zone");
		}

		log::trace!(
			"Registering zone \"{}\" @ {}, size: {}",
			zone.name,
			zone.offset,
			zone.original_size
		);

		match self.zones.iter_mut().find(|z| z.name == zone.name) {
			Some(existing) => *existing = zone,
			None => self.zones.push(zone),
		}

		Ok(())
	}

	/// Shorthand for [`ZoneRegistry::add`] with a plain [`Zone::new`]
	///
	/// # Errors
	///
	/// See [`ZoneRegistry::add`]
	pub fn add_zone(&mut self, offset: u64, size: u64, name: impl Into<String>) -> Result<()> {
		self.add(Zone::new(name, offset, size))
	}

	/// Get a zone by name
	pub fn zone(&self, name: &str) -> Option<&Zone> {
		self.zones.iter().find(|z| z.name == name)
	}

	/// Iterate over the zones in registration order
	pub fn iter(&self) -> impl Iterator<Item = &Zone> {
		self.zones.iter()
	}

	/// The zones in the order the engine emits them
	///
	/// Sorted by offset. At a shared offset, insertion points come before the zone that
	/// starts there, and insertion points keep their registration order.
	pub fn sorted(&self) -> Vec<&Zone> {
		let mut zones = self.zones.iter().collect::<Vec<_>>();
		zones.sort_by_key(|z| (z.offset, !z.is_insertion_point()));
		zones
	}

	/// The number of registered zones
	pub fn len(&self) -> usize {
		self.zones.len()
	}

	/// Whether no zones are registered
	pub fn is_empty(&self) -> bool {
		self.zones.is_empty()
	}

	/// Remove all zones
	pub fn clear(&mut self) {
		self.zones.clear();
	}
}
