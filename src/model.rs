//! Data structures describing the content of a presentation.
//!
//! The types in this module hold plain strings only.  Image payloads are kept as the base64 text
//! handed in by the caller and are decoded lazily by the renderers (see [`crate::images`]), so a
//! presentation can be assembled without pulling any rendering state into the model.

/// Text and logo shared by the top of every page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    text: String,
    image: String,
}

impl Header {
    /// Returns the header text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the base64 encoded header image, empty when none was set.
    pub fn image(&self) -> &str {
        &self.image
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub(crate) fn set_image(&mut self, image: impl Into<String>) {
        self.image = image.into();
    }
}

/// Text shared by the bottom of every page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Footer {
    text: String,
}

impl Footer {
    /// Returns the footer text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// Content of a single page of the presentation.
///
/// Every field is optional in the sense that an empty string simply renders blank; no validation
/// happens when a value is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Screen {
    headline: String,
    text: String,
    image: String,
}

impl Screen {
    /// Creates an empty screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the headline of the screen.
    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Returns the body text of the screen.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the base64 encoded image payload, empty when none was set.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Returns whether an image payload was set.
    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }

    /// Sets the headline.
    pub fn set_headline(&mut self, headline: impl Into<String>) {
        self.headline = headline.into();
    }

    /// Sets the body text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Sets the image payload, expected to be a base64 encoded raster image.
    pub fn set_image(&mut self, image: impl Into<String>) {
        self.image = image.into();
    }

    /// Sets the headline and returns the updated screen.
    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.set_headline(headline);
        self
    }

    /// Sets the body text and returns the updated screen.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Sets the image payload and returns the updated screen.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.set_image(image);
        self
    }
}

/// Render-ready content of one page.
///
/// A record pairs the presentation's header and footer with the content of one screen.  Records
/// own copies of every value, so they are unaffected by later changes to the presentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRecord {
    header_text: String,
    header_image: String,
    footer_text: String,
    headline: String,
    text: String,
    image: String,
}

impl PageRecord {
    /// Combines the shared header and footer with the content of `screen`.
    pub fn new(header: &Header, footer: &Footer, screen: &Screen) -> Self {
        Self {
            header_text: header.text.clone(),
            header_image: header.image.clone(),
            footer_text: footer.text.clone(),
            headline: screen.headline.clone(),
            text: screen.text.clone(),
            image: screen.image.clone(),
        }
    }

    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    pub fn header_image(&self) -> &str {
        &self.header_image
    }

    pub fn footer_text(&self) -> &str {
        &self.footer_text
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::{Footer, Header, PageRecord, Screen};

    #[test]
    fn screen_setters_overwrite_fields() {
        let mut screen = Screen::new();
        screen.set_headline("screen headline");
        screen.set_text("screen text");
        screen.set_image("png base 64");

        assert_eq!(screen.headline(), "screen headline");
        assert_eq!(screen.text(), "screen text");
        assert_eq!(screen.image(), "png base 64");

        screen.set_text("");
        assert_eq!(screen.text(), "");
    }

    #[test]
    fn builder_variants_match_setters() {
        let built = Screen::new()
            .with_headline("Intro")
            .with_text("Hello")
            .with_image("aGk=");

        let mut set = Screen::new();
        set.set_headline("Intro");
        set.set_text("Hello");
        set.set_image("aGk=");

        assert_eq!(built, set);
        assert!(built.has_image());
        assert!(!Screen::new().has_image());
    }

    #[test]
    fn record_copies_header_footer_and_screen() {
        let mut header = Header::default();
        header.set_text("header");
        header.set_image("logo");
        let mut footer = Footer::default();
        footer.set_text("footer");
        let mut screen = Screen::new().with_headline("h").with_text("t").with_image("i");

        let record = PageRecord::new(&header, &footer, &screen);
        screen.set_text("changed afterwards");

        assert_eq!(record.header_text(), "header");
        assert_eq!(record.header_image(), "logo");
        assert_eq!(record.footer_text(), "footer");
        assert_eq!(record.headline(), "h");
        assert_eq!(record.text(), "t");
        assert_eq!(record.image(), "i");
    }
}
