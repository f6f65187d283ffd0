/// Kotlin-style scope functions, handy at the end of long method chains.
pub trait LetAlso: Sized {
    /// Passes `self` by value into `f` and returns whatever `f` returns.
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }

    /// Runs `f` on a reference of `self` and returns `self` afterwards.
    fn also<F>(self, f: F) -> Self
    where
        F: FnOnce(&Self),
    {
        f(&self);
        self
    }
}

impl<T> LetAlso for T {}
