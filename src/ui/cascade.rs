use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventGeometry {
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
    pub original_left: Option<f64>,
}

impl EventGeometry {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height,
            left: 0.0,
            width: 0.0,
            original_left: None,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

pub fn place_in_columns(slots: &mut [EventGeometry], column_width: f64) {
    let mut placed: Vec<EventGeometry> = Vec::with_capacity(slots.len());

    for slot in slots.iter_mut() {
        let top = slot.top;
        let bottom = slot.bottom();
        let taken: Vec<f64> = placed
            .iter()
            .filter(|prev| {
                (top < prev.bottom() && prev.bottom() < bottom)
                    || (prev.top <= top && bottom <= prev.bottom())
            })
            .map(|prev| prev.left)
            .collect();

        let mut left = 0.0;
        while column_width > 0.0 && taken.contains(&left) {
            left += column_width;
        }

        slot.left = left;
        slot.width = column_width;
        slot.original_left = None;

        if slot.height > 0.0 {
            placed.push(*slot);
        }
    }
}

/// Narrows and shifts slots so overlapping events share `column_width`.
///
/// The count of distinct columns is tracked across the whole day, so a
/// later, narrower cascade is still sized against the widest one before it.
pub fn resolve_overlaps(slots: &mut [EventGeometry], column_width: f64) {
    match slots.len() {
        0 => {}
        1 => slots[0].width = column_width,
        len => {
            let mut widest_left = -1.0;
            let mut columns_seen = 0usize;
            let mut envelope: Option<(f64, f64)> = None;
            let mut cascade_start = 0;

            for i in 0..len {
                let top = slots[i].top;
                let bottom = slots[i].bottom();
                let left = slots[i].left;

                match envelope {
                    Some((envelope_top, envelope_bottom))
                        if top >= envelope_top && top < envelope_bottom =>
                    {
                        if left > widest_left {
                            columns_seen += 1;
                            widest_left = left;
                        }
                        if bottom > envelope_bottom {
                            envelope = Some((envelope_top, bottom));
                        }
                    }
                    Some(_) => {
                        layout_cascade(&mut slots[cascade_start..i], columns_seen);
                        envelope = Some((top, bottom));
                        cascade_start = i;
                    }
                    None => {
                        if left > widest_left {
                            columns_seen += 1;
                            widest_left = left;
                        }
                        envelope = Some((top, bottom));
                        cascade_start = i;
                    }
                }
            }

            tracing::trace!(columns_seen, "laying out final cascade");
            layout_cascade(&mut slots[cascade_start..], columns_seen);
        }
    }
}

/// Resizes every member of one cascade, in order.
///
/// Each member's width is divided by the number of columns around it:
/// distinct lefts among earlier members plus the members further right
/// that push the right edge out. When the day needs more columns than
/// that, only the space right of the member's own left is divided.
/// Members sitting exactly one column over are pulled in to the new right
/// edge, remembering where they were.
pub fn layout_cascade(members: &mut [EventGeometry], actual_events_in_cascade: usize) {
    let count = members.len();

    for j in 0..count {
        let current = members[j];
        let mut running_right = current.right();
        let mut reduce_right = 1usize;
        let mut next_column: Vec<usize> = Vec::new();

        for idx in j + 1..count {
            let seed_left = members[j + 1..]
                .iter()
                .map(|m| m.left)
                .find(|left| *left > current.left)
                .unwrap_or(running_right);

            let candidate = members[idx];
            if candidate.left == seed_left && candidate.left != current.left {
                next_column.push(idx);
            }
            if candidate.right() > running_right {
                reduce_right += 1;
                running_right = candidate.right();
            }
        }

        let mut reduce_left = 0usize;
        let mut lefts_found: Vec<f64> = Vec::new();
        for index in (0..j).rev() {
            let earlier = members[index];
            if earlier.left < current.left && !lefts_found.contains(&earlier.left) {
                reduce_left += 1;
                lefts_found.push(earlier.left);
            } else if earlier.left > current.left
                && earlier.top <= current.top
                && earlier.bottom() >= current.bottom()
            {
                members[j].width = earlier.left;
            }
        }

        let reduce = reduce_left + reduce_right;
        let member = &mut members[j];
        member.width = if actual_events_in_cascade > reduce {
            (member.width - member.left) / reduce_right as f64
        } else {
            member.width / reduce as f64
        };

        let new_right = member.right();
        for idx in next_column {
            let sibling = &mut members[idx];
            sibling.original_left = Some(sibling.left);
            sibling.left = new_right;
        }
    }
}
