//! Publish/subscribe primitives shared by quotes, handles and curves.

mod observable;

pub use observable::{AsObservable, Flag, Observable, Observer};
