use std::collections::HashMap;

use tabletop_core::AudioLink;

/// Last gains pushed to the audio transport, keyed by the sorted player pair.
#[derive(Clone, Debug, Default)]
pub struct AudioMixer {
    links: HashMap<(String, String), f32>,
}

impl AudioMixer {
    pub fn gain(&self, a: &str, b: &str) -> f32 {
        self.links.get(&pair_key(a, b)).copied().unwrap_or(0.0)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Replaces the link table and returns what changed. Dropped pairs come
    /// back with gain 0 so the transport can unlink them.
    pub fn sync(&mut self, links: Vec<AudioLink>) -> Vec<AudioLink> {
        let mut next = HashMap::with_capacity(links.len());
        let mut changes = Vec::new();
        for link in links {
            let key = pair_key(&link.a, &link.b);
            if self.links.get(&key) != Some(&link.gain) {
                changes.push(AudioLink {
                    a: key.0.clone(),
                    b: key.1.clone(),
                    gain: link.gain,
                });
            }
            next.insert(key, link.gain);
        }
        let mut dropped: Vec<&(String, String)> = self
            .links
            .keys()
            .filter(|key| !next.contains_key(*key))
            .collect();
        dropped.sort();
        for (a, b) in dropped {
            changes.push(AudioLink {
                a: a.clone(),
                b: b.clone(),
                gain: 0.0,
            });
        }
        self.links = next;
        changes
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
