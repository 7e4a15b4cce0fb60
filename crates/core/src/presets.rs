//! Built-in board layouts.
//!
//! Layouts use the puzzle text format: one line per row, top to bottom, one
//! color character per column and a space for an empty cell. Lines are
//! bottom-aligned when loaded, so a stage only lists the rows it uses.

use crate::error::BoardError;

/// One puzzle stage and the number of swaps it should be solved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleStage {
    pub board: &'static str,
    pub moves: u32,
}

const fn stage(board: &'static str, moves: u32) -> PuzzleStage {
    PuzzleStage { board, moves }
}

pub const SEVEN_COMBO: &str = "\
bgtgbg
rrbbgg
bbbrbr
rrgybt
rbbryt
yrggbb";

pub const WEIRD_DROP: &str = "\
ttbrgr
rgrgrg
rgtgrg
rgtrgr
ytytyt";

pub const SLIDE: &str = "\
tt tgr
rg grg
rg grg
grtrgr
ytytyt";

pub const BIG: &str = "\
ytyy t
ygpttp
pprtrr
pgpggt
tgtppg
gppggt
pggppt
gttpyg
gpptpp
yggppg
gppttg";

pub const ORIGINAL1: [PuzzleStage; 10] = [
    stage(" r rr ", 1),
    stage("  t   \n tt t ", 1),
    stage("  gr  \n  rg  \n  rg  ", 1),
    stage("  by  \n  by  \n  yb  \n  by  \n  by  ", 1),
    stage("  g   \nggtt t", 1),
    stage("      \nrrprpp", 1),
    stage("  r   \n  r   \n  t   \n  r   \n  r   \n  tt  ", 1),
    stage("    y \n    y \n ppyp ", 1),
    stage("  t   \n  gt  \n  ggt ", 1),
    stage("  yr  \n  ry  \n  yr  \n  ry  \n  yr  ", 3),
];

pub const ORIGINAL2: [PuzzleStage; 10] = [
    stage("  y   \n  r   \n  r   \n  y   \n  ryy ", 1),
    stage(" b    \n gb   \n bgg  ", 1),
    stage("  tt  \n pptp ", 1),
    stage("  rg  \n  rgrg", 2),
    stage("      \ntbtbtb", 3),
    stage(
        "  t   \nttg   \nggy   \nyyr   \nrrp   \nppb   \nbbt   \nttg   \nggy   \nyyrb  \nrrbb  ",
        1,
    ),
    stage("   b  \n  gb  \n bgg  ", 2),
    stage("  p   \n  p   \n  r   \n  rp  \n  pr  ", 2),
    stage("  gg  \n  yy  \n  yg  ", 2),
    stage(" rt   \n tr   \n rtrr ", 2),
];

pub const ORIGINAL3: [PuzzleStage; 10] = [
    stage("  y   \n  r   \n  r   \n yy   \n yr y ", 2),
    stage("  t   \n  g   \n  g   \n  tgg \n  tgt ", 2),
    stage("  ty  \n  yt  \nt ty y", 2),
    stage("  r   \n  b   \n  y   \n  yb  \n  br  \n ryr  ", 2),
    stage("   y  \n   bp \n  ppb \n pyybp", 3),
    stage(
        "   y  \n   r  \n   pyy\n   yrr\n   bpp\n   tbb\n   gtt\n   ygg\n   ryy\n  yyrr",
        2,
    ),
    stage("   r  \n   p  \n   r  \n   r  \n   p  \n  pr  \n  prpp", 2),
    stage(" gr   \n rgrg ", 3),
    stage("   t  \n   t  \n  bp  \n  tt  \n  pb  \n bpb  ", 2),
    stage("   p  \n  gp  \n ggb  \n bbp  ", 2),
];

pub const ORIGINAL4: [PuzzleStage; 10] = [
    stage("  r   \n  y   \n  r   \n brr  \n yyb  \n rbr  ", 2),
    stage("  yy  \n  bp  \n  yb  \n bpp  ", 2),
    stage("  y   \n  b   \n  b   \n  g   \n  ggy \n  byy ", 3),
    stage("  rr  \n  gtt \n  grgt", 2),
    stage("   t  \n  tp  \n  gp  \n  tg  \n  pg  \nttgp  ", 3),
    stage(
        "      \ngbt   \npry   \nyyp   \nprt   \npggrb \nbrbbg \nttgrg \nttprp \nggbbg ",
        1,
    ),
    stage("  g   \n  y   \n  y   \nyyt   \ngyggtt", 2),
    stage("  y   \n  yb  \n  rry \n  brb ", 3),
    stage("  r   \n  yr  \n  ry  \n  tt  \n  yg  \n tgg  ", 3),
    stage("    y \n    y \n    r \n   ry \n  rgt \n ggyy \n tyyt ", 3),
];

pub const ORIGINAL5: [PuzzleStage; 10] = [
    stage(
        "   p  \n   g  \n   g  \n   r  \n   r  \n   g  \n   r  \n   g  \n ppgpp",
        2,
    ),
    stage("   pp \n  rgp \n  rbr \n bbgg ", 3),
    stage("  p   \n  yp  \n  by  \n  bt  \n  tb  \n  ptyy", 3),
    stage("  rrt \n  ryp \n  ypp \n  ptt \n  ypp ", 3),
    stage("      \nbbttbb\npgrygp\nprggyp\ntrttyt\npbggbp", 5),
    stage("      \nb b b \ny r y \np r p \ny g y \np g g \nybrby ", 3),
    stage("   b  \n   g  \n r b  \n grg  \n rgbg ", 3),
    stage("   y  \n  gg  \n  rb  \n  ry  \n ybg  \n gbr  ", 3),
    stage("  b   \n  p   \n pt   \n yy   \n tbp  \n ytb  ", 3),
    stage("  yty \nttytty\nyppypt", 3),
];

pub const ORIGINAL6: [PuzzleStage; 10] = [
    stage(" tg   \n tb   \n br   \n gtrr \n gbgg ", 3),
    stage(" gp   \nrbp   \nbtb   \npbp   \nbgtg  \nbrrp  \npptp  ", 3),
    stage("    b \n   br \n  ybr \n  grb \n ygbr \n gyby ", 4),
    stage(" p    \n yy   \n rp   \n ry   \n tt   \n rry  \n tpyy ", 4),
    stage(" tp   \n rg   \n rr   \n gg   \n tp   \n rttp ", 4),
    stage("    t \n    b \n b  y \n t by \n typt \n pptb \n tbby ", 3),
    stage(" y    \n py   \n rr   \n yyp  \n rprr ", 4),
    stage("   r  \n ggb  \n rrg  \n trb  \n rttbr", 4),
    stage(
        "  g   \n  p   \n  t   \n pb   \n yby  \n bpg  \n ypg  \n ptp  \n ptp  ",
        4,
    ),
    stage("   b  \n  by  \n  gty \n  ryt \n  rtr \n ttrb \n grgt ", 4),
];

/// Stage set by name (`"original1"` .. `"original6"`).
pub fn stage_set(name: &str) -> Option<&'static [PuzzleStage]> {
    match name {
        "original1" => Some(&ORIGINAL1),
        "original2" => Some(&ORIGINAL2),
        "original3" => Some(&ORIGINAL3),
        "original4" => Some(&ORIGINAL4),
        "original5" => Some(&ORIGINAL5),
        "original6" => Some(&ORIGINAL6),
        _ => None,
    }
}

/// Stage `n` (1-based) of a named set.
pub fn stage_of(set: &str, n: usize) -> Option<PuzzleStage> {
    let stages = stage_set(set)?;
    n.checked_sub(1).and_then(|i| stages.get(i)).copied()
}

/// Resolve a preset name to its layout.
///
/// Accepts the named boards (`seven-combo`, `weird-drop`, `slide`, `big`) and
/// stages written as `<set>-<n>`, e.g. `original2-6`.
///
/// # Examples
///
/// ```
/// use panel_pop_core::presets;
///
/// assert_eq!(presets::lookup("original1-1").unwrap(), " r rr ");
/// assert!(presets::lookup("original9-1").is_err());
/// ```
pub fn lookup(name: &str) -> Result<&'static str, BoardError> {
    let named = match name {
        "seven-combo" => Some(SEVEN_COMBO),
        "weird-drop" => Some(WEIRD_DROP),
        "slide" => Some(SLIDE),
        "big" => Some(BIG),
        _ => None,
    };
    if let Some(board) = named {
        return Ok(board);
    }

    name.rsplit_once('-')
        .and_then(|(set, n)| stage_of(set, n.parse().ok()?))
        .map(|stage| stage.board)
        .ok_or_else(|| BoardError::UnknownPreset(name.to_string()))
}

/// Every accepted preset name, in display order.
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = ["seven-combo", "weird-drop", "slide", "big"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for set in 1..=6 {
        for n in 1..=10 {
            names.push(format!("original{set}-{n}"));
        }
    }
    names
}
