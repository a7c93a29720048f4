//! Sequential, pull-based frame decoding.
//!
//! [`FrameSource`] is the seam between the extraction loop and whatever
//! produces frames. The FFmpeg-backed implementation is [`FrameStream`]:
//! each call to [`next_frame`](FrameSource::next_frame) reads and decodes
//! just enough packets to produce the next frame in decode order. There is
//! no seeking — frame N is always the Nth frame decoded.

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{error::ExtractError, video::VideoFile};

/// A source of sequentially decoded video frames.
///
/// The extraction loop in [`extract_frames`](crate::extract_frames) is
/// written against this trait so it can be exercised without FFmpeg.
pub trait FrameSource {
    /// Read the next frame in decode order.
    ///
    /// Returns `None` when the stream is exhausted. A failed read or an
    /// empty decoded frame also ends the stream — by contract these are
    /// ordinary end-of-stream conditions, not errors.
    fn next_frame(&mut self) -> Option<DynamicImage>;
}

/// FFmpeg-backed [`FrameSource`] yielding RGB8 frames.
///
/// Frames are decoded one at a time as [`next_frame`](FrameSource::next_frame)
/// is called; nothing is buffered beyond FFmpeg's own decoder state. The
/// stream borrows the underlying [`VideoFile`] mutably, so no other
/// operation can happen while it is alive.
///
/// Created via [`VideoFile::frames`].
pub struct FrameStream<'a> {
    video: &'a mut VideoFile,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    finished: bool,
}

impl<'a> FrameStream<'a> {
    /// Build a decoder and pixel-format converter for the file's video
    /// stream. Decoding starts at the first frame.
    pub(crate) fn new(video: &'a mut VideoFile) -> Result<Self, ExtractError> {
        let video_stream_index = video.video_stream_index;

        let stream = video
            .input_context
            .stream(video_stream_index)
            .ok_or(ExtractError::NoVideoStream)?;
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let decoder = decoder_context.decoder().video()?;

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ScalingFlags::BILINEAR,
        )?;

        Ok(Self {
            video,
            decoder,
            scaler,
            video_stream_index,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            finished: false,
        })
    }

    /// Scale and convert the current `decoded_frame` to a `DynamicImage`.
    fn convert_current_frame(&mut self) -> Result<DynamicImage, ExtractError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;

        let width = self.rgb_frame.width();
        let height = self.rgb_frame.height();
        let buffer = frame_to_rgb_buffer(&self.rgb_frame, width, height);
        let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            ExtractError::Decode(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(rgb_image))
    }
}

impl FrameSource for FrameStream<'_> {
    fn next_frame(&mut self) -> Option<DynamicImage> {
        if self.finished {
            return None;
        }

        loop {
            // Try to receive a frame the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                if self.decoded_frame.width() == 0 || self.decoded_frame.height() == 0 {
                    // An empty decoded frame ends the stream.
                    log::debug!("Received empty frame, treating as end of stream");
                    self.finished = true;
                    return None;
                }

                match self.convert_current_frame() {
                    Ok(image) => return Some(image),
                    Err(error) => {
                        log::warn!("Frame conversion failed, stopping: {error}");
                        self.finished = true;
                        return None;
                    }
                }
            }

            // Decoder has no buffered frames. Feed it more packets.
            if self.eof_sent {
                self.finished = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.video.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            log::debug!("Decoder rejected packet, stopping: {error}");
                            self.finished = true;
                            return None;
                        }
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    // Normal end of the container — drain the decoder.
                    if self.decoder.send_eof().is_err() {
                        self.finished = true;
                        return None;
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    // A single failed read ends extraction.
                    log::debug!("Packet read failed, treating as end of stream: {error}");
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGB
/// buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3).
/// This strips that padding so the result can be passed directly to
/// [`image::RgbImage::from_raw`].
fn frame_to_rgb_buffer(rgb_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = rgb_frame.data(0);

    if stride == expected_stride {
        // No padding — copy the entire plane at once.
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        // Stride includes padding bytes — copy row by row.
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}
