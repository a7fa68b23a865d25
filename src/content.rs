//! Static site content - copy, works, links.
//!
//! Everything here is plain data owned by the binary; sections render it
//! and never mutate it.

/// Artist name shown in the nav brand and footer.
pub const ARTIST_NAME: &str = "Helen Anderson";

/// Site title for the hero headline.
pub const SITE_TITLE: &str = "Dimensional Art";

/// Hero tagline under the headline.
pub const HERO_TAGLINE: &str =
    "Hand-drawn lines. Digital depth. A portfolio of illustrations, concept art, and playful 3D experiments.";

/// A hero slide: background treatment for one carousel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroSlide {
    pub name: &'static str,
    /// Background shade rendered behind the headline.
    pub shade: u8,
}

/// The hero carousel slides.
pub const HERO_SLIDES: [HeroSlide; 2] = [
    HeroSlide {
        name: "hero",
        shade: 24,
    },
    HeroSlide {
        name: "hero2",
        shade: 36,
    },
];

/// One showcase artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artwork {
    pub title: &'static str,
    pub medium: &'static str,
    pub year: &'static str,
}

/// The showcase grid, in display order.
pub const WORKS: [Artwork; 6] = [
    Artwork {
        title: "Portrait Study",
        medium: "Graphite",
        year: "2024",
    },
    Artwork {
        title: "Abstract Lines",
        medium: "Charcoal",
        year: "2024",
    },
    Artwork {
        title: "Nature Sketch",
        medium: "Ink",
        year: "2023",
    },
    Artwork {
        title: "Urban Forms",
        medium: "Pencil",
        year: "2023",
    },
    Artwork {
        title: "Figure Drawing",
        medium: "Charcoal",
        year: "2024",
    },
    Artwork {
        title: "Still Life",
        medium: "Graphite",
        year: "2024",
    },
];

/// A nav link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

/// Top navigation, in display order.
pub const NAV_LINKS: [NavLink; 4] = [
    NavLink {
        href: "/",
        label: "Home",
    },
    NavLink {
        href: "/portfolio",
        label: "Portfolio",
    },
    NavLink {
        href: "/about",
        label: "About",
    },
    NavLink {
        href: "/contact",
        label: "Contact",
    },
];

/// About section heading.
pub const ABOUT_HEADING: &str = "The Journey Behind the Art";

/// About section bio paragraphs.
pub const ABOUT_BIO: [&str; 2] = [
    "I am a passionate artist whose hand-painted works celebrate color, texture, and emotion. \
     Each piece tells a story, inviting viewers to connect with art on a deeply personal level.",
    "The portfolio spans landscapes, abstracts, and portraits, each created with meticulous \
     attention to detail. Art should not just be seen but experienced.",
];

/// Closing quote in the about section.
pub const ABOUT_QUOTE: &str = "Art is not what you see, but what you make others see. Every stroke, \
     every line, every shadow carries the weight of emotion and the lightness of dreams.";

/// Contact section heading.
pub const CONTACT_HEADING: &str = "Let's Create Together";

/// Contact section intro.
pub const CONTACT_INTRO: &str = "Interested in commissioning artwork or discussing a creative \
     project? I'd love to hear about your vision and bring it to life.";

/// Footer services list.
pub const SERVICES: [&str; 4] = [
    "Portrait Commissions",
    "Digital Illustrations",
    "Traditional Artwork",
    "Mixed Media Projects",
];

/// Footer social links.
pub const SOCIAL_LINKS: [&str; 4] = ["Instagram", "Twitter", "LinkedIn", "Behance"];
