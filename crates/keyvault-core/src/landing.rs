//! Content and view state of the landing page.
//!
//! The page itself is rendered by the server; this module owns the copy and
//! the two pieces of page logic: the launch-offer countdown and the FAQ
//! accordion.

/// Number of signups that get the launch price.
pub const LAUNCH_SPOTS: usize = 50;

/// Launch price shown on the page.
pub const LAUNCH_PRICE: &str = "₹199";

/// Remaining launch-offer spots for a waitlist of `count` entries.
///
/// Never negative: once the offer is gone it stays at zero.
#[must_use]
pub fn spots_left(count: usize) -> usize {
    LAUNCH_SPOTS.saturating_sub(count)
}

/// One step of the "How It Works" section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub const HOW_IT_WORKS: [Step; 3] = [
    Step {
        number: 1,
        title: "Upload Key Photo",
        description: "Take a clear photo of your key from both sides",
    },
    Step {
        number: 2,
        title: "AI Creates 3D Model",
        description: "Our AI securely processes and stores your key pattern",
    },
    Step {
        number: 3,
        title: "Reorder Anytime",
        description: "Get physical duplicates delivered in 2 days",
    },
];

pub const TRUST_BADGES: [&str; 4] = [
    "Military-grade encryption",
    "Made in India",
    "Fast 2-day delivery",
    "100% satisfaction guarantee",
];

/// A question and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ_ITEMS: [FaqItem; 3] = [
    FaqItem {
        question: "Is this safe?",
        answer: "Absolutely! We use military-grade encryption to protect your key data. \
                 Your photos are processed and then deleted, with only the encrypted 3D model \
                 stored securely in our servers.",
    },
    FaqItem {
        question: "What key types are supported?",
        answer: "We support most common key types including house keys, car keys, office keys, \
                 and padlock keys. Our AI can handle standard residential and commercial key \
                 profiles.",
    },
    FaqItem {
        question: "What if I don't like the result?",
        answer: "We offer a 100% satisfaction guarantee. If the duplicate key doesn't work \
                 perfectly, we'll remake it for free or provide a full refund.",
    },
];

/// FAQ accordion: at most one item open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaqAccordion {
    open: Option<usize>,
}

impl FaqAccordion {
    /// Accordion with `open` expanded. Out-of-range indexes open nothing.
    #[must_use]
    pub fn with_open(open: Option<usize>) -> Self {
        Self {
            open: open.filter(|&i| i < FAQ_ITEMS.len()),
        }
    }

    /// Index of the expanded item, if any.
    #[must_use]
    pub fn open(self) -> Option<usize> {
        self.open
    }

    #[must_use]
    pub fn is_open(self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Open `index`, or close it if it is already the open item.
    #[must_use]
    pub fn toggle(self, index: usize) -> Self {
        if self.is_open(index) {
            Self { open: None }
        } else {
            Self::with_open(Some(index))
        }
    }
}
