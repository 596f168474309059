use mcm_codec::command::CommandId;
use mcm_codec::frame::decode_frame;
use mcm_codec::request;

/// Simulates encoding the data-chunk sequence for a 760-byte mission file
/// and decoding it back.
#[test]
fn chunking_a_760_byte_mission_produces_four_sequenced_frames() {
    let data: Vec<u8> = (0u8..=255).cycle().take(760).collect();

    let mut offset = 0usize;
    let mut seq = 0u16;
    let mut frames = Vec::new();
    while offset < data.len() {
        let (frame, taken) = request::data_chunk(seq, &data[offset..]);
        frames.push(frame);
        offset += taken;
        seq += 1;
    }

    assert_eq!(frames.len(), 4);
    let expected_sizes = [253, 253, 253, 1];
    for (frame, expected) in frames.iter().zip(expected_sizes) {
        // payload = [command id, seq lo, seq hi, data...]
        assert_eq!(frame.payload.len() - 3, expected);
    }

    for (i, frame) in frames.iter().enumerate() {
        let wire = frame.encode();
        let (decoded, _) = decode_frame(&wire).unwrap();
        assert_eq!(decoded.payload[0], CommandId::DataChunk.to_byte());
        let seq = u16::from_le_bytes([decoded.payload[1], decoded.payload[2]]);
        assert_eq!(seq as usize, i);
    }
}

#[test]
fn sequence_numbers_are_strictly_monotonic_with_no_gaps() {
    let data = vec![0u8; 1024];
    let mut offset = 0usize;
    let mut seq = 0u16;
    let mut seen = Vec::new();
    while offset < data.len() {
        let (frame, taken) = request::data_chunk(seq, &data[offset..]);
        let actual_seq = u16::from_le_bytes([frame.payload[1], frame.payload[2]]);
        seen.push(actual_seq);
        offset += taken;
        seq += 1;
    }
    let expected: Vec<u16> = (0..seen.len() as u16).collect();
    assert_eq!(seen, expected);
}
