use mcm_checksums::{Crc16, crc16_of_slice};
use proptest::prelude::*;

proptest! {
    #[test]
    fn streaming_in_arbitrary_chunks_matches_one_shot(
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        chunk_len in 1usize..300,
    ) {
        let expected = crc16_of_slice(&data);

        let mut crc = Crc16::new();
        for chunk in data.chunks(chunk_len) {
            crc.write(chunk);
        }
        prop_assert_eq!(crc.finish(), expected);
    }
}
