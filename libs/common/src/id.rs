//! Prefixed, time-sortable identifiers.

use ulid::Ulid;

/// What an identifier names. Each kind renders as `<prefix>_<ULID>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// One admin notification socket.
    Connection,
    /// The `jti` claim of an access token.
    Token,
}

impl IdKind {
    pub const fn prefix(self) -> &'static str {
        match self {
            IdKind::Connection => "conn",
            IdKind::Token => "tok",
        }
    }

    /// Mint a fresh identifier of this kind.
    ///
    /// ```
    /// use donation_common::IdKind;
    /// assert!(IdKind::Connection.generate().starts_with("conn_"));
    /// ```
    pub fn generate(self) -> String {
        format!("{}_{}", self.prefix(), Ulid::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_is_prefix_then_ulid() {
        let id = IdKind::Connection.generate();
        let (prefix, body) = id.split_once('_').unwrap();
        assert_eq!(prefix, "conn");
        assert!(Ulid::from_string(body).is_ok());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(IdKind::Token.generate(), IdKind::Token.generate());
    }
}
