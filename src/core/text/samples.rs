/// One text sample shown in the width table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub label: &'static str,
    pub text: &'static str,
}

pub const SAMPLES: [Sample; 5] = [
    Sample {
        label: "ascii",
        text: "A",
    },
    Sample {
        label: "latin accent",
        text: "é",
    },
    Sample {
        label: "box drawing",
        text: "─",
    },
    Sample {
        label: "supplementary",
        text: "𝄞",
    },
    Sample {
        label: "emoji",
        text: "😀",
    },
];
