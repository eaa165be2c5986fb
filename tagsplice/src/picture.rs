//! Format-agnostic picture handling

use std::fmt::{Display, Formatter};

/// MIME types for pictures.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// PNG image
	Png,
	/// JPEG image
	Jpeg,
	/// TIFF image
	Tiff,
	/// BMP image
	Bmp,
	/// GIF image
	Gif,
	/// Some unknown MIME type
	Unknown(String),
}

impl MimeType {
	/// Get a `MimeType` from a string
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::picture::MimeType;
	///
	/// let jpeg_mimetype_str = "image/jpeg";
	/// assert_eq!(MimeType::from_str(jpeg_mimetype_str), MimeType::Jpeg);
	/// ```
	#[must_use]
	#[allow(clippy::should_implement_trait)] // Infallible, unlike `FromStr`
	pub fn from_str(mime_type: &str) -> Self {
		match &*mime_type.to_ascii_lowercase() {
			"image/jpeg" | "image/jpg" => Self::Jpeg,
			"image/png" => Self::Png,
			"image/tiff" => Self::Tiff,
			"image/bmp" => Self::Bmp,
			"image/gif" => Self::Gif,
			_ => Self::Unknown(mime_type.to_owned()),
		}
	}

	/// Guess the `MimeType` from the start of the image data
	///
	/// APE stores pictures without a MIME type, so this is the only way to recover it.
	pub fn from_magic(data: &[u8]) -> Option<Self> {
		match data {
			[0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
			[0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
			[b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
			[b'B', b'M', ..] => Some(Self::Bmp),
			[b'I', b'I', b'*', 0, ..] | [b'M', b'M', 0, b'*', ..] => Some(Self::Tiff),
			_ => None,
		}
	}

	/// Get a &str from a `MimeType`
	pub fn as_str(&self) -> &str {
		match self {
			MimeType::Jpeg => "image/jpeg",
			MimeType::Png => "image/png",
			MimeType::Tiff => "image/tiff",
			MimeType::Bmp => "image/bmp",
			MimeType::Gif => "image/gif",
			MimeType::Unknown(unknown) => unknown,
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

// Each entry is `Variant => ID3v2 APIC byte, APE item key`
macro_rules! picture_types {
	($($(#[$meta:meta])* $variant:ident => $byte:literal, $ape_key:literal);+ $(;)?) => {
		/// The picture type, according to ID3v2 APIC
		#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
		#[non_exhaustive]
		pub enum PictureType {
			$($(#[$meta])* $variant,)+
			/// Any value outside of the defined range
			Undefined(u8),
		}

		impl PictureType {
			/// Get a `u8` from a `PictureType` according to ID3v2 APIC
			pub fn as_u8(&self) -> u8 {
				match self {
					$(Self::$variant => $byte,)+
					Self::Undefined(byte) => *byte,
				}
			}

			/// Get a `PictureType` from a u8 according to ID3v2 APIC
			pub fn from_u8(byte: u8) -> Self {
				match byte {
					$($byte => Self::$variant,)+
					_ => Self::Undefined(byte),
				}
			}

			/// Get an APE item key from a `PictureType`
			pub fn as_ape_key(&self) -> Option<&'static str> {
				match self {
					$(Self::$variant => Some($ape_key),)+
					Self::Undefined(_) => None,
				}
			}

			/// Get a `PictureType` from an APE item key
			///
			/// Returns `None` for keys that don't hold pictures.
			pub fn from_ape_key(key: &str) -> Option<Self> {
				$(
					if key.eq_ignore_ascii_case($ape_key) {
						return Some(Self::$variant);
					}
				)+

				None
			}
		}
	};
}

picture_types! {
	/// Other
	Other => 0, "Cover Art (Other)";
	/// 32x32 PNG file icon
	Icon => 1, "Cover Art (Png Icon)";
	/// Other file icon
	OtherIcon => 2, "Cover Art (Icon)";
	/// Front cover
	CoverFront => 3, "Cover Art (Front)";
	/// Back cover
	CoverBack => 4, "Cover Art (Back)";
	/// Leaflet page
	Leaflet => 5, "Cover Art (Leaflet)";
	/// Media (e.g. label side of a CD)
	Media => 6, "Cover Art (Media)";
	/// Lead artist/performer/soloist
	LeadArtist => 7, "Cover Art (Lead Artist)";
	/// Artist/performer
	Artist => 8, "Cover Art (Artist)";
	/// Conductor
	Conductor => 9, "Cover Art (Conductor)";
	/// Band/orchestra
	Band => 10, "Cover Art (Band)";
	/// Composer
	Composer => 11, "Cover Art (Composer)";
	/// Lyricist/text writer
	Lyricist => 12, "Cover Art (Lyricist)";
	/// Recording location
	RecordingLocation => 13, "Cover Art (Recording Location)";
	/// During recording
	DuringRecording => 14, "Cover Art (During Recording)";
	/// During performance
	DuringPerformance => 15, "Cover Art (During Performance)";
	/// Movie/video screen capture
	ScreenCapture => 16, "Cover Art (Video Capture)";
	/// A bright coloured fish
	BrightFish => 17, "Cover Art (Fish)";
	/// Illustration
	Illustration => 18, "Cover Art (Illustration)";
	/// Band/artist logotype
	BandLogo => 19, "Cover Art (Band Logotype)";
	/// Publisher/studio logotype
	PublisherLogo => 20, "Cover Art (Publisher Logotype)";
}

/// An embedded picture
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Picture {
	pub(crate) pic_type: PictureType,
	pub(crate) mime_type: Option<MimeType>,
	pub(crate) description: Option<String>,
	pub(crate) data: Vec<u8>,
}

impl Picture {
	/// Create a new `Picture`
	///
	/// When `mime_type` is `None`, it is guessed from `data`.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsplice::picture::{MimeType, Picture, PictureType};
	///
	/// let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
	/// let picture = Picture::new(PictureType::CoverFront, None, None, png);
	///
	/// assert_eq!(picture.mime_type(), Some(&MimeType::Png));
	/// ```
	pub fn new(
		pic_type: PictureType,
		mime_type: Option<MimeType>,
		description: Option<String>,
		data: Vec<u8>,
	) -> Self {
		let mime_type = mime_type.or_else(|| MimeType::from_magic(&data));

		Self {
			pic_type,
			mime_type,
			description,
			data,
		}
	}

	/// Returns the [`PictureType`]
	pub fn pic_type(&self) -> PictureType {
		self.pic_type
	}

	/// Returns the [`MimeType`]
	pub fn mime_type(&self) -> Option<&MimeType> {
		self.mime_type.as_ref()
	}

	/// Returns the description
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// Returns the picture data
	pub fn data(&self) -> &[u8] {
		&self.data
	}
}

#[cfg(test)]
mod tests {
	use super::{MimeType, PictureType};

	#[test_log::test]
	fn picture_type_round_trip() {
		for byte in 0..=20 {
			let pic_type = PictureType::from_u8(byte);
			assert_eq!(pic_type.as_u8(), byte);

			let key = pic_type.as_ape_key().unwrap();
			assert_eq!(PictureType::from_ape_key(key), Some(pic_type));
		}

		assert_eq!(PictureType::from_u8(200), PictureType::Undefined(200));
		assert!(PictureType::Undefined(200).as_ape_key().is_none());
		assert!(PictureType::from_ape_key("Album").is_none());
	}

	#[test_log::test]
	fn mime_from_magic() {
		assert_eq!(MimeType::from_magic(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(MimeType::Jpeg));
		assert_eq!(MimeType::from_magic(b"GIF89a"), Some(MimeType::Gif));
		assert_eq!(MimeType::from_magic(b"nope"), None);
		assert_eq!(
			MimeType::from_str("image/x-custom"),
			MimeType::Unknown(String::from("image/x-custom"))
		);
	}
}
