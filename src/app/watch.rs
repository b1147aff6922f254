/// A one-shot registration: once armed, it fires at most once.
///
/// Arming an already armed watch keeps a single pending registration.
#[derive(Debug, Default)]
pub struct OnceWatch {
    armed: bool,
}

impl OnceWatch {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns `true` when the watch was armed, and disarms it.
    pub fn fire(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}
