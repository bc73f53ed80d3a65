//! Case-keyed summary of a diagnostic over the global set of columns.

use {
    anyhow::Result,
    serde::{Deserialize, Serialize},
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::Path,
    },
};

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct MldMap {
    pub name: String,
    pub units: String,
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
    /// NaN where a case has no valid value
    pub data: Vec<f64>,
}

impl MldMap {
    pub fn new(name: &str, units: &str) -> Self {
        MldMap {
            name: name.to_owned(),
            units: units.to_owned(),
            ..MldMap::default()
        }
    }

    pub fn push(&mut self, longitude: f64, latitude: f64, value: Option<f64>) {
        self.longitude.push(longitude);
        self.latitude.push(latitude);
        self.data.push(value.unwrap_or(f64::NAN));
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn write_ascii<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "# {} ({})", self.name, self.units)?;
        writeln!(w, "# lon lat {}", self.name)?;
        for ((lon, lat), value) in self.longitude.iter().zip(&self.latitude).zip(&self.data) {
            writeln!(w, "{:.2} {:.2} {:.4}", lon, lat, value)?;
        }
        Ok(())
    }

    /// Writes `<stem>.asc` and `<stem>.bin` next to each other.
    pub fn save(&self, dir: &Path, stem: &str) -> Result<()> {
        let mut w = BufWriter::new(File::create(dir.join(format!("{}.asc", stem)))?);
        self.write_ascii(&mut w)?;
        w.flush()?;

        let w = BufWriter::new(File::create(dir.join(format!("{}.bin", stem)))?);
        bincode::serialize_into(w, self)?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(bincode::deserialize_from(File::open(path)?)?)
    }
}

#[cfg(test)]
mod test {
    use {super::*, tempdir::TempDir};

    fn map() -> MldMap {
        let mut map = MldMap::new("mld_deltaR", "m");
        map.push(-90.0, -70.0, Some(35.25));
        map.push(14.0, 2.0, None);
        map
    }

    #[test]
    fn ascii() {
        let mut out = vec![];
        map().write_ascii(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            concat!(
                "# mld_deltaR (m)\n",
                "# lon lat mld_deltaR\n",
                "-90.00 -70.00 35.2500\n",
                "14.00 2.00 NaN\n",
            )
        );
    }

    #[test]
    fn save_and_load() {
        let tempdir = TempDir::new("ocean-column").unwrap();

        map().save(tempdir.path(), "data_map").unwrap();
        let loaded = MldMap::load(&tempdir.path().join("data_map.bin")).unwrap();

        assert!(tempdir.path().join("data_map.asc").exists());
        assert_eq!(loaded.longitude, vec![-90.0, 14.0]);
        assert_eq!(loaded.data[0], 35.25);
        assert!(loaded.data[1].is_nan());
    }
}
