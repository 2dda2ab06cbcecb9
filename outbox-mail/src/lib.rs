//! # OutBox Mail
//!
//! SMTP email sending, the single transport OutBox dispatches jobs through.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use outbox_mail::{Mailer, SmtpConfig, Email};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SmtpConfig::new("smtp.example.com")
//!         .credentials("user@example.com", "password")
//!         .port(587)
//!         .starttls();
//!
//!     let mailer = Mailer::smtp(config).await?;
//!
//!     let email = Email::new()
//!         .from("sender@example.com")
//!         .to("recipient@example.com")
//!         .subject("Hello from OutBox!")
//!         .text("This is a test email.")
//!         .html("<h1>Hello!</h1><p>This is a test email.</p>");
//!
//!     let sent = mailer.send(email).await?;
//!     println!("sent as {}", sent.message_id);
//!     Ok(())
//! }
//! ```

mod address;
mod email;
mod error;
mod mailer;
mod transport;

pub use address::{Address, IntoAddress, Mailbox};
pub use email::{Email, EmailBuilder};
pub use error::{MailError, Result};
pub use mailer::{Mailer, MailerConfig};
pub use transport::{SentEmail, SmtpConfig, SmtpSecurity, SmtpTransport, Transport};

/// Prelude for common imports.
///
/// ```
/// use outbox_mail::prelude::*;
/// ```
pub mod prelude {
    pub use crate::address::{Address, IntoAddress, Mailbox};
    pub use crate::email::{Email, EmailBuilder};
    pub use crate::error::{MailError, Result};
    pub use crate::mailer::{Mailer, MailerConfig};
    pub use crate::transport::{SentEmail, SmtpConfig, SmtpSecurity, SmtpTransport, Transport};
}
