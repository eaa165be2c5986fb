//! Format-agnostic file parsing tools

use crate::config::ReadOptions;
use crate::error::Result;
use crate::file::{ContainerLayout, FileType, FileTypeGuessResult, TaggedFile};
use crate::iff::chunk::Chunks;
use crate::macros::decode_err;

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::LittleEndian;

/// A format agnostic reader
///
/// This provides a way to determine the [`FileType`] of a reader, for when a concrete
/// type is not known.
///
/// ## Usage
///
/// When reading from a path, the [`FileType`] will be inferred from the path, rather than the
/// open file.
///
/// ```rust,no_run
/// # fn main() -> tagsplice::error::Result<()> {
/// use tagsplice::file::FileType;
/// use tagsplice::probe::Probe;
///
/// let probe = Probe::open("path/to/my.tak")?;
///
/// // Inferred from the `tak` extension
/// assert_eq!(probe.file_type(), Some(FileType::Tak));
/// # Ok(()) }
/// ```
///
/// When a path isn't available, or is unreliable, content based detection is also possible.
///
/// ```rust
/// # fn main() -> tagsplice::error::Result<()> {
/// use std::io::Cursor;
/// use tagsplice::file::FileType;
/// use tagsplice::probe::Probe;
///
/// let probe = Probe::new(Cursor::new(b"DSD \x1c\0\0\0")).guess_file_type()?;
/// assert_eq!(probe.file_type(), Some(FileType::Dsf));
/// # Ok(()) }
/// ```
pub struct Probe<R: Read> {
	inner: R,
	options: Option<ReadOptions>,
	f_ty: Option<FileType>,
}

impl<R: Read> Probe<R> {
	/// Create a new `Probe`
	///
	/// Before creating a `Probe`, consider wrapping it in a [`BufReader`] for better
	/// performance.
	pub const fn new(reader: R) -> Self {
		Self {
			inner: reader,
			options: None,
			f_ty: None,
		}
	}

	/// Create a new `Probe` with a specified [`FileType`]
	///
	/// Content based detection is skipped, the parser for `file_type` is used as-is.
	pub fn with_file_type(reader: R, file_type: FileType) -> Self {
		Self {
			inner: reader,
			options: None,
			f_ty: Some(file_type),
		}
	}

	/// Returns the current [`FileType`]
	pub fn file_type(&self) -> Option<FileType> {
		self.f_ty
	}

	/// Set the [`FileType`] with which to read the file
	pub fn set_file_type(mut self, file_type: FileType) -> Self {
		self.f_ty = Some(file_type);
		self
	}

	/// Set the [`ReadOptions`] for the Probe
	pub fn options(mut self, options: ReadOptions) -> Self {
		self.options = Some(options);
		self
	}

	/// Extract the reader
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl Probe<BufReader<File>> {
	/// Opens a file for reading
	///
	/// This will initially guess the [`FileType`] from the path, but this can be overwritten
	/// with [`Probe::guess_file_type`] or [`Probe::set_file_type`]
	///
	/// # Errors
	///
	/// * `path` does not exist
	pub fn open<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		log::debug!("Probe: Opening `{}` for reading", path.display());

		Ok(Self {
			inner: BufReader::new(File::open(path)?),
			options: None,
			f_ty: FileType::from_path(path),
		})
	}
}

impl<R: Read + Seek> Probe<R> {
	/// Attempts to get the [`FileType`] based on the data in the reader
	///
	/// On success, the file type will be replaced. If the content isn't recognized, the
	/// current file type (if any) is kept.
	///
	/// # Errors
	///
	/// All errors that occur within this function are [`std::io::Error`].
	/// If an error does occur, there is likely an issue with the provided
	/// reader, and the entire `Probe` should be discarded.
	pub fn guess_file_type(mut self) -> std::io::Result<Self> {
		let f_ty = guess_file_type(&mut self.inner)?;
		self.f_ty = f_ty.or(self.f_ty);

		log::debug!("Probe: Guessed file type: {:?}", self.f_ty);

		Ok(self)
	}

	/// Attempts to extract a [`TaggedFile`] from the reader
	///
	/// # Errors
	///
	/// * No file type
	///     - This expects the file type to have been set already, either with
	///       [`Probe::guess_file_type`] or [`Probe::set_file_type`]. When reading from
	///       paths, this is not necessary.
	/// * The reader contains invalid data
	pub fn read(mut self) -> Result<TaggedFile> {
		let options = self.options.unwrap_or_default();
		let layout = self.read_inner(options)?;

		Ok(TaggedFile::from_layout(layout, options))
	}

	/// Attempts to extract the [`ContainerLayout`] from the reader
	///
	/// This exposes the zones and patches the container registered, for use with the
	/// [`surgery`](crate::surgery) module directly.
	///
	/// # Errors
	///
	/// See [`Probe::read`]
	pub fn read_layout(mut self) -> Result<ContainerLayout> {
		let options = self.options.unwrap_or_default();
		self.read_inner(options)
	}

	fn read_inner(&mut self, options: ReadOptions) -> Result<ContainerLayout> {
		let Some(file_type) = self.f_ty else {
			decode_err!(@BAIL "Unable to determine the file format");
		};

		layout_for(file_type, &mut self.inner, options)
	}
}

/// Determine the format of `reader` from its content
///
/// The stream position is restored afterwards. `None` means the format isn't supported.
///
/// # Errors
///
/// * `std::io::Error`
///
/// # Examples
///
/// ```rust
/// # fn main() -> std::io::Result<()> {
/// use std::io::Cursor;
/// use tagsplice::file::FileType;
/// use tagsplice::probe::guess_file_type;
///
/// let mut reader = Cursor::new(b"tBaK\0\0\0\0");
/// assert_eq!(guess_file_type(&mut reader)?, Some(FileType::Tak));
/// # Ok(()) }
/// ```
pub fn guess_file_type<R>(reader: &mut R) -> std::io::Result<Option<FileType>>
where
	R: Read + Seek,
{
	let starting_position = reader.stream_position()?;
	let guess = guess_inner(reader);
	reader.seek(SeekFrom::Start(starting_position))?;

	guess
}

fn guess_inner<R>(reader: &mut R) -> std::io::Result<Option<FileType>>
where
	R: Read + Seek,
{
	let mut buf = [0; 12];

	let starting_position = reader.stream_position()?;
	let buf_len = std::io::copy(
		&mut reader.by_ref().take(buf.len() as u64),
		&mut Cursor::new(&mut buf[..]),
	)? as usize;

	let Some(file_type_guess) = FileType::from_buffer_inner(&buf[..buf_len]) else {
		return Ok(None);
	};

	match file_type_guess {
		// v3 WavPack files are RIFF WAVE files, with WavPack data in the `data` chunk
		FileTypeGuessResult::Determined(FileType::Wav) => {
			reader.seek(SeekFrom::Start(starting_position + 12))?;
			let riff_end = starting_position + 8 + u64::from(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]));

			if data_chunk_is_wavpack(reader, riff_end)? {
				return Ok(Some(FileType::WavPack));
			}

			Ok(Some(FileType::Wav))
		},
		FileTypeGuessResult::Determined(file_ty) => Ok(Some(file_ty)),
		// Of the supported formats, only TAK may be preceded by an ID3v2 tag
		FileTypeGuessResult::MaybePrecededById3 { size, footer } => {
			let tag_size = 10 + u64::from(size) + if footer { 10 } else { 0 };
			log::debug!("Probe: ID3v2 tag detected, skipping {tag_size} bytes");

			reader.seek(SeekFrom::Start(starting_position + tag_size))?;

			let mut ident = [0; 4];
			if reader.read_exact(&mut ident).is_err() {
				return Ok(None);
			}

			match &ident {
				b"tBaK" => Ok(Some(FileType::Tak)),
				_ => Ok(None),
			}
		},
	}
}

fn data_chunk_is_wavpack<R>(reader: &mut R, riff_end: u64) -> std::io::Result<bool>
where
	R: Read + Seek,
{
	let position = reader.stream_position()?;
	let mut chunks = Chunks::<LittleEndian>::new(riff_end.saturating_sub(position));

	// Any error here just means it isn't WavPack, the WAV parser will report it properly
	while let Ok(true) = chunks.next(reader) {
		if &chunks.fourcc == b"data" {
			let mut ident = [0; 4];
			return Ok(reader.read_exact(&mut ident).is_ok() && &ident == b"wvpk");
		}

		if chunks.skip(reader).is_err() {
			break;
		}
	}

	Ok(false)
}

/// Guess the format of `reader` and run its container parser
pub(crate) fn parse_layout<R>(reader: &mut R, options: ReadOptions) -> Result<ContainerLayout>
where
	R: Read + Seek,
{
	let Some(file_type) = guess_file_type(reader)? else {
		decode_err!(@BAIL "Unable to determine the file format");
	};

	layout_for(file_type, reader, options)
}

fn layout_for<R>(file_type: FileType, reader: &mut R, options: ReadOptions) -> Result<ContainerLayout>
where
	R: Read + Seek,
{
	if !options.read_tags && !options.read_properties {
		log::debug!("Skipping both tag and property reading, only the layout will be read");
	}

	match file_type {
		FileType::Wav => crate::iff::wav::read::read_layout(reader, options),
		FileType::Dsf => crate::dsd::dsf::read::read_layout(reader, options),
		FileType::Tak => crate::tak::read::read_layout(reader, options),
		FileType::WavPack => crate::wavpack::read::read_layout(reader, options),
	}
}

/// Read a [`TaggedFile`] from a [File]
///
/// # Errors
///
/// See:
///
/// * [`Probe::guess_file_type`]
/// * [`Probe::read`]
pub fn read_from(file: &mut File) -> Result<TaggedFile> {
	Probe::new(BufReader::new(file)).guess_file_type()?.read()
}

/// Read a [`TaggedFile`] from a path
///
/// NOTE: This will determine the [`FileType`] from the extension
///
/// # Errors
///
/// See:
///
/// * [`Probe::open`]
/// * [`Probe::read`]
pub fn read_from_path<P>(path: P) -> Result<TaggedFile>
where
	P: AsRef<Path>,
{
	Probe::open(path)?.read()
}

#[cfg(test)]
mod tests {
	use super::{Probe, guess_file_type, parse_layout};
	use crate::config::{ReadOptions, WriteOptions};
	use crate::error::ErrorKind;
	use crate::file::FileType;
	use crate::tag::{TagData, TagFormat};

	use std::io::{Cursor, Seek, SeekFrom};

	fn riff(data: &[u8]) -> Vec<u8> {
		let mut file = b"RIFF".to_vec();
		file.extend_from_slice(&(4 + 8 + data.len() as u32).to_le_bytes());
		file.extend_from_slice(b"WAVE");
		file.extend_from_slice(b"data");
		file.extend_from_slice(&(data.len() as u32).to_le_bytes());
		file.extend_from_slice(data);
		file
	}

	fn guess(content: &[u8]) -> Option<FileType> {
		guess_file_type(&mut Cursor::new(content)).unwrap()
	}

	#[test_log::test]
	fn signatures() {
		assert_eq!(guess(b"DSD \x1c\0\0\0"), Some(FileType::Dsf));
		assert_eq!(guess(b"tBaK\0\0\0\0"), Some(FileType::Tak));
		assert_eq!(guess(b"wvpk\0\0\0\0"), Some(FileType::WavPack));
		assert_eq!(guess(b"OggS\0\0\0\0"), None);
	}

	#[test_log::test]
	fn riff_contents_decide() {
		assert_eq!(guess(&riff(&[0; 8])), Some(FileType::Wav));
		assert_eq!(guess(&riff(b"wvpk\0\0\0\0")), Some(FileType::WavPack));
	}

	#[test_log::test]
	fn id3v2_before_tak() {
		let mut data = TagData::new();
		data.set_title("Title");

		let mut file = TagFormat::Id3v2.encode(&data, WriteOptions::new()).unwrap();
		let mut wav = file.clone();

		file.extend_from_slice(b"tBaK\0\0\0\0");
		assert_eq!(guess(&file), Some(FileType::Tak));

		wav.extend(riff(&[0; 8]));
		assert_eq!(guess(&wav), None);
	}

	#[test_log::test]
	fn position_is_restored() {
		let mut reader = Cursor::new(riff(b"wvpk\0\0\0\0"));
		reader.seek(SeekFrom::Start(0)).unwrap();

		guess_file_type(&mut reader).unwrap();
		assert_eq!(reader.stream_position().unwrap(), 0);
	}

	#[test_log::test]
	fn unknown_format() {
		let err = parse_layout(&mut Cursor::new(vec![0; 64]), ReadOptions::new()).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::Format(_)));

		let err = Probe::new(Cursor::new(vec![0; 64])).read().unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::Format(_)));
	}
}
