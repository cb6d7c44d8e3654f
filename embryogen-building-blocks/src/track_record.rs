//! Parses and serves the optional trajectory-hinter input: a whitespace
//! table of `TIME X Y Z ID PARENT FLAG` rows, used to build `VectorImg`
//! guidance fields for trajectory-driven nuclei.

use embryogen_concepts::errors::ConfigError;
use embryogen_concepts::vec3::{Vec3, };

#[derive(Clone, Copy, Debug)]
pub struct TrackPoint {
    pub time: f32,
    pub pos: Vec3<f32>,
    pub parent: i64,
    pub flag: i64,
}

#[derive(Clone, Debug, Default)]
pub struct TrackRecord {
    tracks: std::collections::BTreeMap<i64, Vec<TrackPoint>>,
}

impl TrackRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the trajectory-hinter text format, scaling coordinates by
    /// `pos_scale` and time by `(time_scale, time_shift)`.
    pub fn parse(
        text: &str,
        pos_scale: Vec3<f32>,
        time_scale: f32,
        time_shift: f32,
    ) -> Result<Self, ConfigError> {
        let mut record = TrackRecord::new();
        for (lineno, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() != 7 {
                return Err(ConfigError::new(format!(
                    "trajectory hinter line {}: expected 7 columns, got {}",
                    lineno + 1,
                    cols.len()
                )));
            }
            let parse_f = |s: &str| -> Result<f32, ConfigError> {
                s.parse::<f32>().map_err(|e| {
                    ConfigError::new(format!("trajectory hinter line {}: {e}", lineno + 1))
                })
            };
            let parse_i = |s: &str| -> Result<i64, ConfigError> {
                s.parse::<i64>().map_err(|e| {
                    ConfigError::new(format!("trajectory hinter line {}: {e}", lineno + 1))
                })
            };

            let time = parse_f(cols[0])? * time_scale + time_shift;
            let x = parse_f(cols[1])? * pos_scale.x;
            let y = parse_f(cols[2])? * pos_scale.y;
            let z = parse_f(cols[3])? * pos_scale.z;
            let id = parse_i(cols[4])?;
            let parent = parse_i(cols[5])?;
            let flag = parse_i(cols[6])?;

            record.tracks.entry(id).or_default().push(TrackPoint {
                time,
                pos: Vec3::new(x, y, z),
                parent,
                flag,
            });
        }
        for points in record.tracks.values_mut() {
            points.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap());
        }
        Ok(record)
    }

    pub fn track_ids(&self) -> impl Iterator<Item = &i64> {
        self.tracks.keys()
    }

    /// Linear interpolation of track `id`'s position at `time`. Returns
    /// `None` outside the track's recorded time span.
    pub fn position_at(&self, id: i64, time: f32) -> Option<Vec3<f32>> {
        let points = self.tracks.get(&id)?;
        if points.is_empty() {
            return None;
        }
        if time < points[0].time || time > points[points.len() - 1].time {
            return None;
        }
        for w in points.windows(2) {
            let (a, b) = (w[0], w[1]);
            if time >= a.time && time <= b.time {
                let span = b.time - a.time;
                let t = if span.abs() < 1e-9 {
                    0.0
                } else {
                    (time - a.time) / span
                };
                return Some(a.pos + (b.pos - a.pos) * t);
            }
        }
        Some(points[points.len() - 1].pos)
    }

    /// Displacement vector of track `id` between two times, or `None` if
    /// either time falls outside the recorded span.
    pub fn displacement(&self, id: i64, t0: f32, t1: f32) -> Option<Vec3<f32>> {
        let p0 = self.position_at(id, t0)?;
        let p1 = self.position_at(id, t1)?;
        Some(p1 - p0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_interpolates() {
        let text = "\
# comment
0.0 0.0 0.0 0.0 1 0 0
1.0 10.0 0.0 0.0 1 0 0
";
        let rec = TrackRecord::parse(text, Vec3::splat(1.0), 1.0, 0.0).unwrap();
        let mid = rec.position_at(1, 0.5).unwrap();
        assert!((mid.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn displacement_between_endpoints() {
        let text = "0.0 0.0 0.0 0.0 1 0 0\n2.0 4.0 0.0 0.0 1 0 0\n";
        let rec = TrackRecord::parse(text, Vec3::splat(1.0), 1.0, 0.0).unwrap();
        let d = rec.displacement(1, 0.0, 2.0).unwrap();
        assert!((d.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn rejects_malformed_row() {
        let text = "0.0 0.0 0.0 1 0 0\n";
        assert!(TrackRecord::parse(text, Vec3::splat(1.0), 1.0, 0.0).is_err());
    }
}
