use rand::Rng;

use crate::types::Site;

/// The two registries' sites, read-only after startup.
#[derive(Debug, Clone, Default)]
pub struct SiteLists {
    parks: Vec<Site>,
    rec_areas: Vec<Site>,
}

impl SiteLists {
    pub fn new(parks: Vec<Site>, rec_areas: Vec<Site>) -> Self {
        Self { parks, rec_areas }
    }

    pub fn len(&self) -> usize {
        self.parks.len() + self.rec_areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Site> {
        pick_random(&self.parks, &self.rec_areas, rng)
    }
}

/// Uniform draw over parks followed by rec areas. Repeats across calls are expected.
/// Returns `None` only when both lists are empty.
pub fn pick_random<'a, R: Rng + ?Sized>(
    parks: &'a [Site],
    rec_areas: &'a [Site],
    rng: &mut R,
) -> Option<&'a Site> {
    let total = parks.len() + rec_areas.len();
    if total == 0 {
        return None;
    }
    let index = rng.random_range(0..total);
    parks.iter().chain(rec_areas).nth(index)
}
