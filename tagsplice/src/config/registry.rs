use crate::resolve::{ResolvedView, resolve};
use crate::tag::{TagSystemView, TagType};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

/// The order in which tag systems are consulted when reading
///
/// A `PriorityList` always holds every known [`TagType`] exactly once, [`TagType::Any`] is never
/// part of it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PriorityList([TagType; TagType::COUNT]);

impl PriorityList {
	/// The default priority: `[Id3v2, Ape, Native, Id3v1]`
	pub const DEFAULT: Self = Self([
		TagType::Id3v2,
		TagType::Ape,
		TagType::Native,
		TagType::Id3v1,
	]);

	/// Create a `PriorityList` from an explicit order
	///
	/// Returns `None` if `order` doesn't contain every known tag type exactly once.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::config::PriorityList;
	/// use tagsplice::tag::TagType;
	///
	/// let list = PriorityList::new([TagType::Ape, TagType::Id3v2, TagType::Id3v1, TagType::Native]);
	/// assert!(list.is_some());
	///
	/// let duplicated = PriorityList::new([TagType::Ape, TagType::Ape, TagType::Id3v1, TagType::Native]);
	/// assert!(duplicated.is_none());
	/// ```
	pub fn new(order: [TagType; TagType::COUNT]) -> Option<Self> {
		let complete = TagType::KNOWN
			.iter()
			.all(|known| order.iter().filter(|t| *t == known).count() == 1);

		complete.then_some(Self(order))
	}

	/// The tag types, highest priority first
	pub fn as_slice(&self) -> &[TagType] {
		&self.0
	}

	/// Iterate over the tag types, highest priority first
	pub fn iter(&self) -> impl Iterator<Item = TagType> + '_ {
		self.0.iter().copied()
	}

	/// The rank of `tag_type`, `0` being the highest priority
	pub fn rank_of(&self, tag_type: TagType) -> Option<usize> {
		self.0.iter().position(|t| *t == tag_type)
	}

	/// Move `tag_type` to `rank`
	///
	/// The type previously holding `rank` takes the slot `tag_type` vacated. Out of range ranks
	/// and [`TagType::Any`] are ignored.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::config::PriorityList;
	/// use tagsplice::tag::TagType;
	///
	/// let mut list = PriorityList::DEFAULT;
	/// list.set_priority(TagType::Id3v1, 0);
	///
	/// assert_eq!(
	/// 	list.as_slice(),
	/// 	&[TagType::Id3v1, TagType::Ape, TagType::Native, TagType::Id3v2]
	/// );
	/// ```
	pub fn set_priority(&mut self, tag_type: TagType, rank: usize) {
		if rank >= TagType::COUNT {
			log::debug!("Ignoring out of range priority rank {rank} for {tag_type:?}");
			return;
		}

		let Some(current) = self.rank_of(tag_type) else {
			log::debug!("Ignoring priority change for {tag_type:?}");
			return;
		};

		self.0.swap(current, rank);
	}
}

impl Default for PriorityList {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Process-wide knowledge of the tag systems and how to combine them
///
/// Holds the [`PriorityList`] and the cross-reading switch. One shared instance lives behind
/// [`TagTypeRegistry::global`], but independent registries can be created with
/// [`TagTypeRegistry::new`] (useful for tests, or callers wanting isolated settings).
///
/// Mutations are last-writer-wins.
#[derive(Debug)]
pub struct TagTypeRegistry {
	priority: Mutex<PriorityList>,
	cross_reading: AtomicBool,
}

impl TagTypeRegistry {
	/// Create a registry with the default priority and cross-reading enabled
	pub fn new() -> Self {
		Self {
			priority: Mutex::new(PriorityList::DEFAULT),
			cross_reading: AtomicBool::new(true),
		}
	}

	/// The process-wide registry, created on first use
	pub fn global() -> &'static Self {
		static INSTANCE: OnceLock<TagTypeRegistry> = OnceLock::new();
		INSTANCE.get_or_init(|| {
			log::debug!("Initializing the global tag type registry");
			Self::new()
		})
	}

	/// A snapshot of the current priority list
	pub fn priority(&self) -> PriorityList {
		*self.priority.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// See [`PriorityList::set_priority`]
	pub fn set_priority(&self, tag_type: TagType, rank: usize) {
		self.priority
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.set_priority(tag_type, rank);
	}

	/// Replace the entire priority list
	pub fn set_priority_list(&self, list: PriorityList) {
		*self.priority.lock().unwrap_or_else(PoisonError::into_inner) = list;
	}

	/// Whether multiple tag systems are merged into one view when reading
	pub fn cross_reading(&self) -> bool {
		self.cross_reading.load(Ordering::Acquire)
	}

	/// Enable or disable cross-reading
	pub fn set_cross_reading(&self, cross_reading: bool) {
		self.cross_reading.store(cross_reading, Ordering::Release);
	}

	/// Restore the default priority and enable cross-reading
	pub fn reset(&self) {
		self.set_priority_list(PriorityList::DEFAULT);
		self.set_cross_reading(true);
	}

	/// Resolve `views` against this registry's current settings
	///
	/// See [`resolve`](crate::resolve::resolve).
	pub fn resolve<'a>(
		&self,
		views: &[&'a dyn TagSystemView],
		forced: TagType,
	) -> ResolvedView<'a> {
		resolve(views, &self.priority(), self.cross_reading(), forced)
	}
}

impl Default for TagTypeRegistry {
	fn default() -> Self {
		Self::new()
	}
}
