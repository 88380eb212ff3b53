//! Security classes governing header and signature attachment (§3, §4.1).

/// Tags a request with the header/signature rules that apply to it.
///
/// See §4.1: `X-MBX-APIKEY` is attached iff the class is [`Trade`](SecurityClass::Trade),
/// [`UserData`](SecurityClass::UserData), [`UserStream`](SecurityClass::UserStream) or
/// [`MarketData`](SecurityClass::MarketData). The HMAC signature is attached iff the class is
/// [`Trade`](SecurityClass::Trade) or [`UserData`](SecurityClass::UserData).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityClass {
    Public,
    Trade,
    UserData,
    UserStream,
    MarketData,
}

impl SecurityClass {
    /// Whether `X-MBX-APIKEY` must be attached for this class.
    pub fn needs_api_key(self) -> bool {
        matches!(
            self,
            Self::Trade | Self::UserData | Self::UserStream | Self::MarketData
        )
    }

    /// Whether the canonical query must be HMAC-signed for this class.
    pub fn needs_signature(self) -> bool {
        matches!(self, Self::Trade | Self::UserData)
    }
}
