//! Property-based tests for the SSE decoder.
//!
//! The core correctness property of the stream decoder is chunking
//! invariance: however the byte stream is split into chunks, the decoded
//! frames and the extracted text are identical.

use model_test_console::runner::normalize::extract_stream_text;
use model_test_console::runner::sse::{SseDecoder, SseItem};
use proptest::prelude::*;

const STREAM: &str = concat!(
    "event: message_start\n",
    "data: {\"type\":\"message_start\"}\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"lo \"}}]}\n",
    "event: content_block_delta\n",
    "data: {\"delta\":{\"text\":\"wor\"}}\n",
    "data: {\"text\":\"ld\"}\n",
    "data: not-json\n",
    "data: [DONE]\n",
);

/// Decode the whole input split at the given byte offsets.
fn decode_with_splits(input: &[u8], splits: &[usize]) -> (Vec<SseItem>, String) {
    let mut decoder = SseDecoder::new();
    let mut items = vec![];
    let mut start = 0;
    let mut offsets: Vec<usize> = splits.iter().map(|s| s % (input.len() + 1)).collect();
    offsets.sort_unstable();
    for offset in offsets {
        if offset > start {
            items.extend(decoder.feed(&input[start..offset]));
            start = offset;
        }
    }
    if start < input.len() {
        items.extend(decoder.feed(&input[start..]));
    }

    let mut output = String::new();
    for item in &items {
        if let SseItem::Frame(frame) = item {
            if let Ok(payload) = serde_json::from_str(&frame.data) {
                output.push_str(&extract_stream_text(&payload));
            }
        }
    }
    (items, output)
}

proptest! {
    /// Property: decoding is invariant under arbitrary chunk boundaries.
    #[test]
    fn prop_chunking_invariance(splits in prop::collection::vec(0usize..512, 0..16)) {
        let (baseline_items, baseline_output) = decode_with_splits(STREAM.as_bytes(), &[]);
        let (items, output) = decode_with_splits(STREAM.as_bytes(), &splits);

        prop_assert_eq!(items, baseline_items);
        prop_assert_eq!(output, baseline_output);
    }

    /// Property: the frame count is stable and the text always reassembles.
    #[test]
    fn prop_frame_count_stable(splits in prop::collection::vec(0usize..512, 0..16)) {
        let (items, output) = decode_with_splits(STREAM.as_bytes(), &splits);

        let frames = items.iter().filter(|i| matches!(i, SseItem::Frame(_))).count();
        // 6 data lines before the sentinel; message_start and not-json count
        // as frames but contribute no text.
        prop_assert_eq!(frames, 6);
        prop_assert!(items.contains(&SseItem::Done));
        prop_assert_eq!(output, "Hello world");
    }

    /// Property: splitting inside a single data line still yields exactly one
    /// frame for it, never zero or two.
    #[test]
    fn prop_split_line_yields_one_frame(split in 1usize..21) {
        let line = b"data: {\"text\":\"x\"}\n\n";
        let split = split.min(line.len() - 1);

        let mut decoder = SseDecoder::new();
        let mut items = decoder.feed(&line[..split]);
        items.extend(decoder.feed(&line[split..]));

        let frames: Vec<_> = items
            .iter()
            .filter(|i| matches!(i, SseItem::Frame(_)))
            .collect();
        prop_assert_eq!(frames.len(), 1);
    }
}

#[test]
fn test_byte_at_a_time_decoding() {
    let mut decoder = SseDecoder::new();
    let mut items = vec![];
    for byte in STREAM.as_bytes() {
        items.extend(decoder.feed(std::slice::from_ref(byte)));
    }
    let (baseline_items, _) = decode_with_splits(STREAM.as_bytes(), &[]);
    assert_eq!(items, baseline_items);
}
