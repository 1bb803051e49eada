//! Fuzz target: `decode_command`
//!
//! Feeds arbitrary bytes (as lossy UTF-8) to the JSON command decoder.
//!
//! Invariants checked:
//! - No panics under any input
//! - A decoded `set`/`write` always re-encodes to text that decodes to the
//!   same command
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinboard::app::commands::AppCommand;
use pinboard::rpc::codec::decode_command;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let Ok(cmd) = decode_command(&text) else {
        return;
    };

    let canonical = match cmd {
        AppCommand::Configure {
            pin,
            mode,
            initial_level: Some(level),
        } => format!(
            r#"{{"type":"set","gpio":{pin},"mode":"{}","value":{level}}}"#,
            mode.as_str()
        ),
        AppCommand::Configure {
            pin,
            mode,
            initial_level: None,
        } => format!(r#"{{"type":"set","gpio":{pin},"mode":"{}"}}"#, mode.as_str()),
        AppCommand::Drive { pin, level } => {
            format!(r#"{{"type":"write","gpio":{pin},"value":{level}}}"#)
        }
        AppCommand::RequestSnapshot => r#"{"type":"snapshot"}"#.to_owned(),
    };
    assert_eq!(decode_command(&canonical), Ok(cmd));
});
