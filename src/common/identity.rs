// src/common/identity.rs

use super::codec::CodecError;
use alloc::string::{String, ToString};

/// Fields of the `*IDN?` reply, captured once at connection setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identification {
    pub model: String,
    pub serial: String,
    pub digital_revision: String,
    pub display_revision: String,
    pub board_revision: String,
}

impl Identification {
    /// Splits `Model,Serial,dig/disp/brd` into its five fields.
    ///
    /// The last two commas delimit the serial number, so a leading
    /// manufacturer field stays part of the model. A missing comma or slash
    /// is malformed.
    pub fn parse(reply: &str) -> Result<Self, CodecError> {
        let reply = reply.trim_end_matches(['\r', '\n', '\0']);
        let (head, revisions) = reply.rsplit_once(',').ok_or(CodecError::Malformed)?;
        let (model, serial) = head.rsplit_once(',').ok_or(CodecError::Malformed)?;
        let (digital, rest) = revisions.split_once('/').ok_or(CodecError::Malformed)?;
        let (display, board) = rest.split_once('/').ok_or(CodecError::Malformed)?;

        Ok(Identification {
            model: model.to_string(),
            serial: serial.to_string(),
            digital_revision: digital.to_string(),
            display_revision: display.to_string(),
            board_revision: board.to_string(),
        })
    }
}
