// Who the storefront is acting for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Guest,
    // Signed in via OTP; the phone number keys server-side state.
    Authenticated { phone: String },
}

impl Session {
    pub fn phone(&self) -> Option<&str> {
        match self {
            Session::Guest => None,
            Session::Authenticated { phone } => Some(phone),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Session::Guest)
    }
}
