// Cosmetic concealment for unrevealed answers. Not meant to resist anyone.

const LCG_MULTIPLIER: u32 = 1_103_515_245;
const LCG_INCREMENT: u32 = 12_345;
const LCG_MASK: u32 = 0x7fff_ffff;

struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT)
            & LCG_MASK;
        self.state
    }
}

/// Shuffle the characters of every whitespace-delimited run in place, keeping
/// whitespace where it is. The same `seed` always gives the same output.
pub fn scramble(text: &str, seed: u32) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let mut rng = Lcg::new(seed);

    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() {
            i += 1;
        }
        let run = &mut chars[start..i];
        for j in (1..run.len()).rev() {
            let k = rng.next() as usize % (j + 1);
            run.swap(j, k);
        }
    }

    chars.into_iter().collect()
}
