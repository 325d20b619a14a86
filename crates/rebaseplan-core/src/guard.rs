use std::cell::Cell;

use tracing::{debug, warn};

use crate::error::VcsError;
use crate::port::VcsPort;

/// Remembers the checkout active when acquired and puts it back on the way out.
///
/// Branch switches made through [`CheckoutGuard::switch_to`] are undone by
/// [`CheckoutGuard::restore`], or on drop if `restore` was never reached.
/// A detached HEAD is remembered by commit id.
pub struct CheckoutGuard<'a> {
    port: &'a dyn VcsPort,
    original: String,
    switched: Cell<bool>,
    released: bool,
}

impl<'a> CheckoutGuard<'a> {
    pub fn acquire(port: &'a dyn VcsPort) -> Result<Self, VcsError> {
        let original = match port.current_ref()? {
            Some(branch) => branch,
            None => port.resolve("HEAD")?,
        };
        debug!(original = %original, "captured checkout");
        Ok(Self {
            port,
            original,
            switched: Cell::new(false),
            released: false,
        })
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn switch_to(&self, ref_name: &str) -> Result<(), VcsError> {
        self.switched.set(true);
        self.port.checkout(ref_name)
    }

    pub fn restore(mut self) -> Result<(), VcsError> {
        self.released = true;
        self.checkout_original()
    }

    fn checkout_original(&self) -> Result<(), VcsError> {
        if !self.switched.get() {
            return Ok(());
        }
        debug!(original = %self.original, "restoring checkout");
        self.port.checkout(&self.original)
    }

    /// Run `body` and restore the original checkout whether it succeeds or not.
    ///
    /// A failure from `body` takes precedence over a failure to restore.
    pub fn scoped<T>(
        port: &'a dyn VcsPort,
        body: impl FnOnce(&CheckoutGuard<'a>) -> Result<T, VcsError>,
    ) -> Result<T, VcsError> {
        let guard = Self::acquire(port)?;
        let result = body(&guard);
        match (result, guard.restore()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore_err)) => {
                warn!("could not restore checkout: {restore_err}");
                Err(e)
            }
        }
    }
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.checkout_original() {
            warn!("could not restore checkout of {}: {e}", self.original);
        }
    }
}
