//! Interaction layer of the site: the scripts that run once a page is
//! loaded.
//!
//! A [`Page`] owns the document, the listener registry, the timer queue and
//! the animation manager. The host drives it with lifecycle and input
//! events through [`Page::dispatch`] and moves time forward with
//! [`Page::advance`]; every controller reacts through handlers registered
//! during initialization.
//!
//! ```text
//! Page
//!   ├── PageContext (document, config, listeners, timers, animations, notices)
//!   ├── InitState   (one-time bootstrap flag)
//!   └── controllers: drawer, form, scroll, hero, cards, scroll reveal
//! ```

pub mod aos;
pub mod bootstrap;
pub mod context;
pub mod drawer;
pub mod error;
pub mod event;
pub mod footer;
pub mod form;
pub mod header;
pub mod hero;
pub mod reveal;
pub mod runtime;
pub mod scroll;
pub mod timers;

pub use bootstrap::{InitReport, InitState, StepOutcome};
pub use context::{Notice, NoticeKind, Observer, PageContext, ReadyState};
pub use drawer::{DrawerController, DrawerState};
pub use error::{PageError, SubmitError};
pub use event::{DispatchOutcome, DomEvent, EventKind, Handler, ListenerId, Listeners, PageEvent, Target};
pub use form::{FieldError, FormController, SimulatedSubmitter, Submitter};
pub use header::header_height;
pub use runtime::{FRAME_MS, Page, PageOptions};
pub use timers::{Debounce, Task, TimerId, TimerQueue};
