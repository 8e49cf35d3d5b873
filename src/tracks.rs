/// Circuits the entries site is known to carry, keyed by URL slug.
const TRACKS: &[(&str, &str)] = &[
    ("aqueduct", "Aqueduct"),
    ("belmont-park", "Belmont Park"),
    ("churchill-downs", "Churchill Downs"),
    ("del-mar", "Del Mar"),
    ("fair-grounds", "Fair Grounds"),
    ("gulfstream-park", "Gulfstream Park"),
    ("keeneland", "Keeneland"),
    ("laurel-park", "Laurel Park"),
    ("oaklawn-park", "Oaklawn Park"),
    ("pimlico", "Pimlico"),
    ("remington-park", "Remington Park"),
    ("santa-anita", "Santa Anita"),
    ("saratoga", "Saratoga"),
    ("tampa-bay-downs", "Tampa Bay Downs"),
    ("woodbine", "Woodbine"),
];

pub fn display_name(slug: &str) -> Option<&'static str> {
    TRACKS
        .iter()
        .find(|(candidate, _)| *candidate == slug)
        .map(|(_, name)| *name)
}

pub fn all() -> impl Iterator<Item = (&'static str, &'static str)> {
    TRACKS.iter().copied()
}
