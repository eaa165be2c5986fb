/// The normalized fields every tag system is mapped onto
///
/// Each codec translates its own keys (ID3v2 frame IDs, APE item keys, RIFF INFO chunk IDs, ...)
/// to and from these. Anything without a `FieldKey` ends up in the additional fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum FieldKey {
	Title,
	Artist,
	Composer,
	Comment,
	Genre,
	Album,
	AlbumArtist,
	Conductor,
	Copyright,
	OriginalArtist,
	OriginalAlbum,
	GeneralDescription,
	Publisher,
	TrackNumber,
	TrackTotal,
	DiscNumber,
	DiscTotal,
	RecordingDate,
	PublishingDate,
	/// A rating in `0.0..=1.0`
	Popularity,
}

impl FieldKey {
	/// Every field key, in a stable order
	pub const ALL: [FieldKey; 20] = [
		Self::Title,
		Self::Artist,
		Self::Composer,
		Self::Comment,
		Self::Genre,
		Self::Album,
		Self::AlbumArtist,
		Self::Conductor,
		Self::Copyright,
		Self::OriginalArtist,
		Self::OriginalAlbum,
		Self::GeneralDescription,
		Self::Publisher,
		Self::TrackNumber,
		Self::TrackTotal,
		Self::DiscNumber,
		Self::DiscTotal,
		Self::RecordingDate,
		Self::PublishingDate,
		Self::Popularity,
	];

	/// Whether the field holds a number
	pub fn is_numeric(self) -> bool {
		matches!(
			self,
			Self::TrackNumber | Self::TrackTotal | Self::DiscNumber | Self::DiscTotal
		)
	}

	/// Whether `value` counts as "not set" for this field
	///
	/// Blank values are always empty. Numeric fields are also empty when they hold `0`, as
	/// several formats use `0` to mean "unknown".
	pub fn is_empty_value(self, value: &str) -> bool {
		let value = value.trim();
		if value.is_empty() {
			return true;
		}

		self.is_numeric() && leading_number(value) == Some(0)
	}
}

/// Parse the number at the start of `value`
///
/// Handles the common "n/total" form, returning `n`.
pub(crate) fn leading_number(value: &str) -> Option<u32> {
	let value = value.trim_start();
	let end = value
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(value.len());

	value[..end].parse().ok()
}
