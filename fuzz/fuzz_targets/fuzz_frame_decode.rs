#![no_main]

use libfuzzer_sys::fuzz_target;
use warptag::protocol::{FrameKind, Message, codec};

fuzz_target!(|data: &[u8]| {
    for kind in [FrameKind::State, FrameKind::Key] {
        // Reads never exceed one frame
        let bytes = &data[..data.len().min(kind.frame_len())];

        // Decoding must not panic on any input
        let msg = codec::decode(bytes, kind);

        // Whatever was decoded survives a second trip over the wire
        let encoded = codec::encode(&msg);
        let expected_len = match msg {
            Message::Quit => codec::QUIT_TEXT.len() + 1,
            _ => kind.frame_len(),
        };
        assert_eq!(encoded.len(), expected_len);
        assert_eq!(codec::decode(&encoded, kind), msg, "frame {bytes:?} is not stable");
    }
});
