/// Addressable module on the MCM side of the serial link.
///
/// Only the MCM module itself is ever addressed by this mediator; the
/// variant still exists (rather than being a bare constant) because the
/// wire format carries a recipient byte and `Frame::recipient` needs a type
/// to decode it into.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Module {
    /// The Mission Control Module (the jamming appliance).
    Mcm = 1,
}

impl TryFrom<u8> for Module {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Module::Mcm),
            other => Err(other),
        }
    }
}

impl From<Module> for u8 {
    fn from(module: Module) -> Self {
        module as u8
    }
}
