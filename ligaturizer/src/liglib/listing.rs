use std::fmt::{self, Display, Formatter};

use glyphs::prelude::{FontProject, RuleGroup};

/// A human-readable listing of what a compilation added to a font.
pub struct Listing<'a> {
    project: &'a FontProject,
}

impl<'a> Listing<'a> {
    #[must_use]
    pub fn new(project: &'a FontProject) -> Listing<'a> {
        Listing { project }
    }
}

struct GroupHeading<'a>(&'a RuleGroup);

impl Display for GroupHeading<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let group = self.0;
        write!(f, "{:30} {:10}", group.name.as_str(), group.kind.to_string())?;
        if let Some(feature) = &group.feature {
            write!(f, " feature {feature}")?;
        }
        if let Some(after) = &group.after {
            write!(f, " after {after}")?;
        }
        Ok(())
    }
}

impl Display for Listing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let created = self.project.created_glyphs();
        writeln!(f, "Created glyphs ({}):", created.len())?;
        for glyph in created {
            match &glyph.outline {
                Some(source) => writeln!(
                    f,
                    "    {:30} <- {} of {}",
                    glyph.name.as_str(),
                    source.glyph,
                    source.resource
                )?,
                None => writeln!(f, "    {}", glyph.name)?,
            }
        }

        let rules = self.project.rules();
        writeln!(f, "Rule groups ({}):", rules.len())?;
        for group in rules.groups() {
            writeln!(f, "    {}", GroupHeading(group))?;
            for bound in &group.rules {
                match &bound.subtable {
                    Some(subtable) => writeln!(f, "        {subtable}: {}", bound.rule)?,
                    None => writeln!(f, "        {}", bound.rule)?,
                }
            }
        }
        Ok(())
    }
}
