//! Piece-decorator field tables.
//!
//! One entry per decorator kind observed in legacy saves: an optional
//! spec schema over the configuration embedded after the kind tag, plus
//! an optional state schema over the per-game mutable state. Registration
//! order is semantic because tags match by substring -- `markmoved` must
//! precede `mark`.

use decant_core::{Coerce, LinkDecoder, LinkRegistry, Schema};

fn layered(spec: Option<Schema>, state: Option<Schema>) -> LinkDecoder {
    LinkDecoder::Layered { spec, state }
}

/// Registry of every piece-decorator kind we have a layout for.
pub fn piece_links() -> LinkRegistry {
    LinkRegistry::new()
        .with(
            "piece",
            layered(
                Some(Schema::of([
                    ("cloneKey", Coerce::Str),
                    ("deleteKey", Coerce::Str),
                    ("imageName", Coerce::Str),
                    ("commonName", Coerce::Str),
                ])),
                Some(Schema::of([
                    ("mapId", Coerce::Str),
                    ("x", Coerce::Int),
                    ("y", Coerce::Int),
                    ("gpId", Coerce::Str),
                ])),
            ),
        )
        .with(
            "stack",
            layered(
                None,
                Some(
                    Schema::of([
                        ("mapId", Coerce::Str),
                        ("x", Coerce::Int),
                        ("y", Coerce::Int),
                    ])
                    .with_trailing("ids", Coerce::Str),
                ),
            ),
        )
        .with(
            "hide",
            layered(
                Some(Schema::of([
                    ("hideKey", Coerce::Key),
                    ("command", Coerce::Str),
                    ("bgColor", Coerce::Color),
                    ("access", Coerce::Str),
                    ("transparency", Coerce::Float),
                ])),
                Some(Schema::of([("hiddenBy", Coerce::Str)])),
            ),
        )
        .with(
            "clone",
            layered(
                Some(Schema::of([
                    ("commandName", Coerce::Str),
                    ("key", Coerce::Key),
                ])),
                None,
            ),
        )
        // before "mark": tags match by substring
        .with(
            "markmoved",
            layered(
                Some(Schema::of([
                    ("movedIcon", Coerce::Str),
                    ("xOffset", Coerce::Int),
                    ("yOffset", Coerce::Int),
                    ("command", Coerce::Str),
                    ("key", Coerce::Key),
                ])),
                Some(Schema::of([("hasMoved", Coerce::Bool)])),
            ),
        )
        // spec carries the labels, state the values; represented as one map
        .with(
            "mark",
            LinkDecoder::LabelValues {
                field: "marks".to_owned(),
                delim: ',',
            },
        )
        .with(
            "sendto",
            layered(
                Some(Schema::of([
                    ("commandName", Coerce::Str),
                    ("key", Coerce::Key),
                    ("mapId", Coerce::Str),
                    ("boardName", Coerce::Str),
                    ("x", Coerce::Int),
                    ("y", Coerce::Int),
                    ("backCommandName", Coerce::Str),
                    ("backKey", Coerce::Key),
                    ("xIndex", Coerce::Int),
                    ("yIndex", Coerce::Int),
                    ("xOffset", Coerce::Int),
                    ("yOffset", Coerce::Int),
                    ("description", Coerce::Str),
                    ("destination", Coerce::Str),
                    ("zone", Coerce::Str),
                    ("region", Coerce::Str),
                    ("propertyFilter", Coerce::Str),
                    ("gridLocation", Coerce::Str),
                ])),
                Some(Schema::of([
                    ("backMapId", Coerce::Str),
                    ("backMapX", Coerce::Int),
                    ("backMapY", Coerce::Int),
                ])),
            ),
        )
        .with(
            "emb2",
            layered(
                Some(Schema::of([
                    ("activateCommand", Coerce::Str),
                    ("activateModifiers", Coerce::Int),
                    ("activateKey", Coerce::Str),
                    ("upCommand", Coerce::Str),
                    ("upModifiers", Coerce::Int),
                    ("upKey", Coerce::Str),
                    ("downCommand", Coerce::Str),
                    ("downModifiers", Coerce::Int),
                    ("downKey", Coerce::Str),
                    ("resetCommand", Coerce::Str),
                    ("resetKey", Coerce::Key),
                    ("resetLevel", Coerce::Str),
                    ("drawUnderneathWhenSelected", Coerce::Bool),
                    ("xOff", Coerce::Int),
                    ("yOff", Coerce::Int),
                    ("imageName", Coerce::list(Coerce::Str, ',')),
                    ("commonName", Coerce::list(Coerce::Str, ',')),
                    ("loopLevels", Coerce::Bool),
                    ("name", Coerce::Str),
                    ("rndKey", Coerce::Key),
                    ("rndText", Coerce::Str),
                    ("followProperty", Coerce::Bool),
                    ("propertyName", Coerce::Str),
                    ("firstLevelValue", Coerce::Int),
                    ("version", Coerce::Int),
                    ("alwaysActive", Coerce::Bool),
                    ("activateKeyStroke", Coerce::Key),
                    ("increaseKeyStroke", Coerce::Key),
                    ("decreaseKeyStroke", Coerce::Key),
                ])),
                Some(Schema::of([("value", Coerce::Int)])),
            ),
        )
        .with(
            "footprint",
            layered(
                Some(Schema::of([
                    ("trailKey", Coerce::Key),
                    ("menuCommand", Coerce::Str),
                    ("initiallyVisible", Coerce::Bool),
                    ("globallyVisible", Coerce::Bool),
                    ("circleRadius", Coerce::Int),
                    ("fillColor", Coerce::Color),
                    ("lineColor", Coerce::Color),
                    ("selectedTransparency", Coerce::Int),
                    ("unSelectedTransparency", Coerce::Int),
                    ("edgePointBuffer", Coerce::Int),
                    ("edgeDisplayBuffer", Coerce::Int),
                    ("lineWidth", Coerce::Float),
                ])),
                Some(
                    Schema::of([
                        ("globalVisibility", Coerce::Bool),
                        ("startMapId", Coerce::Str),
                        ("numPoints", Coerce::Int),
                    ])
                    .with_trailing(
                        "points",
                        Coerce::fields(
                            Schema::of([("x", Coerce::Int), ("y", Coerce::Int)]),
                            ',',
                        ),
                    ),
                ),
            ),
        )
        .with(
            "label",
            layered(
                Some(Schema::of([
                    ("labelKey", Coerce::Key),
                    ("menuCommand", Coerce::Str),
                    ("fontSize", Coerce::Int),
                    ("textBg", Coerce::Color),
                    ("textFg", Coerce::Color),
                    ("verticalPos", Coerce::VAlign),
                    ("verticalOffset", Coerce::Int),
                    ("horizontalPos", Coerce::HAlign),
                    ("horizontalOffset", Coerce::Int),
                    ("verticalJust", Coerce::VAlign),
                    ("horizontalJust", Coerce::HAlign),
                    ("nameFormat", Coerce::Str),
                    ("fontFamily", Coerce::Str),
                    ("fontStyle", Coerce::Str),
                    ("rotateDegrees", Coerce::Int),
                    ("propertyName", Coerce::Str),
                    ("description", Coerce::Str),
                ])),
                Some(Schema::of([("label", Coerce::Str)])),
            ),
        )
        .with(
            "macro",
            layered(
                Some(Schema::of([
                    ("name", Coerce::Str),
                    ("command", Coerce::Str),
                    ("key", Coerce::Key),
                    ("propertyMatch", Coerce::Str),
                    ("watchKeys", Coerce::list(Coerce::Key, ',')),
                    ("actionKeys", Coerce::list(Coerce::Key, ',')),
                    ("loopConfig", Coerce::Str),
                    ("preLoopKeyConfig", Coerce::Str),
                    ("postLoopKeyConfig", Coerce::Str),
                    ("loopTypeConfig", Coerce::Str),
                    ("whileExpressionConfig", Coerce::Str),
                    ("untilExpressionConfig", Coerce::Str),
                    ("loopCountConfig", Coerce::Str),
                    ("indexConfig", Coerce::Str),
                    ("indexPropertyConfig", Coerce::Str),
                    ("indexStartConfig", Coerce::Str),
                    ("indexStepConfig", Coerce::Str),
                ])),
                None,
            ),
        )
        .with(
            "report",
            layered(
                Some(Schema::of([
                    ("keys", Coerce::list(Coerce::Key, ',')),
                    ("reportFormat", Coerce::Str),
                    ("cycleDownKeys", Coerce::list(Coerce::Key, ',')),
                    ("cycleReportFormat", Coerce::list(Coerce::Str, ',')),
                    ("description", Coerce::Str),
                ])),
                Some(Schema::of([("cycleIndex", Coerce::Int)])),
            ),
        )
        .with(
            "submenu",
            layered(
                Some(Schema::of([
                    ("subMenu", Coerce::Str),
                    ("commands", Coerce::list(Coerce::Str, ',')),
                ])),
                None,
            ),
        )
        .with(
            "immob",
            layered(
                Some(Schema::of([
                    ("selectionOptions", Coerce::Str),
                    ("movementOptions", Coerce::Str),
                ])),
                None,
            ),
        )
        .with(
            "delete",
            layered(
                Some(Schema::of([
                    ("nameInput", Coerce::Str),
                    ("keyInput", Coerce::Key),
                ])),
                None,
            ),
        )
        .with(
            "prototype",
            layered(
                Some(Schema::of([
                    ("name", Coerce::Str),
                    ("properties", Coerce::pairs(',', '=')),
                ])),
                None,
            ),
        )
        // TODO: validAngles == 1 saves carry a setAngle key/text pair in
        // place of the CW/CCW fields; needs a conditional layout
        .with(
            "rotate",
            layered(
                Some(Schema::of([
                    ("validAngles", Coerce::Int),
                    ("rotateCWKey", Coerce::Key),
                    ("rotateCCWKey", Coerce::Key),
                    ("rotateCWText", Coerce::Str),
                    ("rotateCCWText", Coerce::Str),
                    ("rotateRNDKey", Coerce::Key),
                    ("rotateRNDText", Coerce::Str),
                    ("name", Coerce::Str),
                ])),
                Some(Schema::of([("angleIndex", Coerce::Int)])),
            ),
        )
}
