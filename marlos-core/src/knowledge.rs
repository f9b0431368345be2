//! The local knowledge base: an ordered table of trigger phrases and
//! canned replies.
//!
//! Table order is significant. When several entries could match a message,
//! the earliest entry wins, and within an entry the earliest key wins.
//!
//! A knowledge base can be replaced from TOML:
//!
//! ```toml
//! [[entry]]
//! keys = ["dns", "qué significa dns"]
//! reply = "DNS traduce nombres de dominio a direcciones IP."
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MarlosError, Result};
use crate::normalize::normalize;

/// One trigger-phrase → reply row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Trigger phrases, in priority order. Compared after normalization.
    pub keys: Vec<String>,
    /// Reply returned verbatim when any key matches.
    pub reply: String,
}

impl KnowledgeEntry {
    /// Create an entry from borrowed keys.
    #[must_use]
    pub fn new(keys: &[&str], reply: impl Into<String>) -> Self {
        Self {
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
            reply: reply.into(),
        }
    }
}

/// Which row and key produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeHit<'a> {
    /// Position of the entry in table order.
    pub index: usize,
    /// The key that matched, as written in the table.
    pub key: &'a str,
    /// The entry's reply.
    pub reply: &'a str,
}

#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default, rename = "entry")]
    entries: Vec<KnowledgeEntry>,
}

/// Immutable, validated knowledge base with pre-normalized keys.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    /// `normalized[i][j]` is `normalize(entries[i].keys[j])`.
    normalized: Vec<Vec<String>>,
}

impl KnowledgeBase {
    /// Validate and index a table.
    ///
    /// # Errors
    /// Returns [`MarlosError::Knowledge`] if an entry has no keys, an empty
    /// reply, or a key that normalizes to the empty string (which would
    /// match every message).
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if entry.keys.is_empty() {
                return Err(MarlosError::Knowledge {
                    index,
                    reason: "entry has no keys".to_string(),
                });
            }
            if entry.reply.trim().is_empty() {
                return Err(MarlosError::Knowledge {
                    index,
                    reason: "reply is empty".to_string(),
                });
            }
            let mut keys = Vec::with_capacity(entry.keys.len());
            for key in &entry.keys {
                let folded = normalize(key);
                if folded.is_empty() {
                    return Err(MarlosError::Knowledge {
                        index,
                        reason: format!("key {key:?} has no matchable characters"),
                    });
                }
                keys.push(folded);
            }
            normalized.push(keys);
        }
        Ok(Self { entries, normalized })
    }

    /// Parse a `[[entry]]` table from TOML.
    ///
    /// # Errors
    /// Returns [`MarlosError::Config`] on malformed TOML, or
    /// [`MarlosError::Knowledge`] if validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let file: KnowledgeFile =
            toml::from_str(toml_str).map_err(|e| MarlosError::Config(e.to_string()))?;
        Self::new(file.entries)
    }

    /// Load a `[[entry]]` table from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The built-in IT-support table.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = builtin_entries();
        let normalized = entries
            .iter()
            .map(|e| e.keys.iter().map(|k| normalize(k)).collect())
            .collect();
        Self { entries, normalized }
    }

    /// Entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry/key pair whose normalized key occurs in `normalized_message`.
    ///
    /// The message must already be normalized; see [`crate::normalize`].
    #[must_use]
    pub fn lookup(&self, normalized_message: &str) -> Option<KnowledgeHit<'_>> {
        for (index, (entry, keys)) in self.entries.iter().zip(&self.normalized).enumerate() {
            for (raw, folded) in entry.keys.iter().zip(keys) {
                if normalized_message.contains(folded.as_str()) {
                    return Some(KnowledgeHit {
                        index,
                        key: raw,
                        reply: &entry.reply,
                    });
                }
            }
        }
        None
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            &["dirección ip", "qué es una dirección ip", "qué es ip", "ip"],
            "Una dirección IP es un identificador único que identifica un dispositivo en una red. Hay IPv4 (ej. 192.168.1.1) e IPv6 (ej. 2001:0db8::).",
        ),
        KnowledgeEntry::new(
            &["dns", "qué significa dns", "configurar dns"],
            "DNS (Domain Name System) traduce nombres de dominio legibles (ej. ejemplo.com) a direcciones IP. En Windows puedes cambiarlo en Propiedades del adaptador → IPv4 → Propiedades → Usar las siguientes direcciones DNS.",
        ),
        KnowledgeEntry::new(
            &["ram", "cuánta ram", "cuanta ram", "cómo saber cuánta ram"],
            "En Windows abre Configuración → Sistema → Acerca de o usa el Administrador de tareas en la pestaña Rendimiento para ver la memoria instalada y uso.",
        ),
        KnowledgeEntry::new(
            &["hdd vs ssd", "hdd", "ssd", "diferencia hdd ssd"],
            "SSD es significativamente más rápido que un HDD porque almacena datos en memoria flash. HDD usa platos mecánicos y es más barato por GB.",
        ),
        KnowledgeEntry::new(
            &["temporales", "archivos temporales", "limpiar temporales", "cómo limpiar archivos temporales"],
            "En Windows usa %temp% y borra contenido, o Herramienta Liberador de espacio en disco; también Configuración → Sistema → Almacenamiento → Archivos temporales.",
        ),
        KnowledgeEntry::new(
            &["configurar dns en windows 10"],
            "Para configurar DNS en Windows 10: Panel de control → Centro de redes y recursos compartidos → Cambiar configuración del adaptador → clic derecho en tu adaptador → Propiedades → IPv4 → Propiedades → Usar las siguientes direcciones DNS.",
        ),
        KnowledgeEntry::new(
            &["ipv4 vs ipv6", "ipv4 ipv6"],
            "IPv4 usa direcciones de 32 bits (ej. 192.168.0.1). IPv6 usa 128 bits y permite muchas más direcciones; IPv6 es el futuro ante el agotamiento de IPv4.",
        ),
        KnowledgeEntry::new(
            &["velocidad de disco", "comprobar velocidad de mi disco"],
            "Puedes usar herramientas como CrystalDiskMark para medir velocidad de lectura/escritura del disco. Windows no incluye un benchmark nativo detallado.",
        ),
        KnowledgeEntry::new(
            &["drivers", "qué es un driver", "actualizar drivers"],
            "Un driver es software que permite al sistema operativo comunicarse con hardware. Actualízalos desde la web del fabricante o mediante el Administrador de dispositivos.",
        ),
        KnowledgeEntry::new(
            &["procesos y ram", "procesos que consumen memoria"],
            "En Administrador de tareas (Ctrl+Shift+Esc) ves procesos ordenados por uso de memoria/CPU. Allí puedes finalizar procesos problemáticos con precaución.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.len(), 10);
        KnowledgeBase::new(kb.entries().to_vec()).expect("built-in entries validate");
    }

    #[test]
    fn lookup_is_accent_insensitive() {
        let kb = KnowledgeBase::builtin();
        let hit = kb
            .lookup(&normalize("¿Qué es una DIRECCION IP?"))
            .expect("ip entry matches");
        assert_eq!(hit.index, 0);
        assert_eq!(hit.key, "dirección ip");
        assert!(hit.reply.starts_with("Una dirección IP"));
    }

    #[test]
    fn earlier_entry_wins() {
        let kb = KnowledgeBase::builtin();
        // "configurar dns en windows 10" also contains "dns" from entry #1.
        let hit = kb
            .lookup(&normalize("Configurar DNS en Windows 10"))
            .expect("dns matches");
        assert_eq!(hit.index, 1);
        assert_eq!(hit.key, "dns");

        // "ipv4 vs ipv6" contains "ip" from entry #0.
        let hit = kb.lookup(&normalize("IPv4 vs IPv6")).expect("ip matches");
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn substring_containment_not_word_match() {
        let kb = KnowledgeBase::builtin();
        // "programa" contains "ram".
        let hit = kb.lookup(&normalize("un programa lento")).expect("ram matches");
        assert_eq!(hit.index, 2);
    }

    #[test]
    fn miss_returns_none() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.lookup(&normalize("hola, buenos días")).is_none());
        assert!(kb.lookup("").is_none());
    }

    #[test]
    fn validation_rejects_bad_entries() {
        let err = KnowledgeBase::new(vec![KnowledgeEntry::new(&[], "reply")])
            .expect_err("no keys");
        assert!(matches!(err, MarlosError::Knowledge { index: 0, .. }));

        let err = KnowledgeBase::new(vec![
            KnowledgeEntry::new(&["ok"], "fine"),
            KnowledgeEntry::new(&["?!"], "never"),
        ])
        .expect_err("key normalizes to empty");
        assert!(matches!(err, MarlosError::Knowledge { index: 1, .. }));

        let err = KnowledgeBase::new(vec![KnowledgeEntry::new(&["k"], "  ")])
            .expect_err("empty reply");
        assert!(matches!(err, MarlosError::Knowledge { index: 0, .. }));
    }

    #[test]
    fn loads_from_toml() {
        let kb = KnowledgeBase::from_toml(
            r#"
            [[entry]]
            keys = ["impresora", "printer"]
            reply = "Revisa el cable y la cola de impresión."

            [[entry]]
            keys = ["wifi"]
            reply = "Reinicia el router."
            "#,
        )
        .expect("valid table");
        assert_eq!(kb.len(), 2);
        let hit = kb.lookup(&normalize("Mi PRINTER no va")).expect("matches");
        assert_eq!(hit.reply, "Revisa el cable y la cola de impresión.");

        let empty = KnowledgeBase::from_toml("").expect("empty table");
        assert!(empty.is_empty());
    }
}
