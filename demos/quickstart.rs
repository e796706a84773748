use chrono::{FixedOffset, Utc};
use chronotag::{
    as_aware, as_calendar_date, as_naive, is_naive, AwareDateTime, Date, DateTime, Fold,
    InstanceCheck, NaiveDateTime, Time,
};

fn main() -> Result<(), chronotag::Error> {
    let today = Date::today();
    let now: DateTime<Utc> = DateTime::now(Utc)?;
    println!("today: {today}");
    println!("now (UTC): {now}");
    println!("today is a Date: {}", Date::matches(&today));
    println!("now is a Date: {}", Date::matches(&now));

    let alarm = Time::new(7, 30, 0, 0)?;
    println!("alarm {alarm} naive: {}", is_naive(&alarm));

    let berlin = FixedOffset::east_opt(3600).ok_or(chronotag::ConstructionError::Overflow)?;
    let meeting: DateTime<FixedOffset> =
        DateTime::with_tz(2024, 1, 2, 13, 0, 0, 0, berlin, Fold::Earlier)?;
    println!("meeting: {meeting} = {}", meeting.astimezone(Utc)?);

    // values read from outside are unchecked until narrowed
    let parsed: DateTime = "2024-01-02T13:00:00".parse()?;
    let trusted: NaiveDateTime = as_naive(parsed.clone())?;
    println!("parsed {trusted} as naive");
    if let Err(err) = as_aware(parsed) {
        println!("rejected: {err}");
    }

    let aware: AwareDateTime = as_aware(meeting.clone().widen())?;
    println!("aware: {aware:?}");
    println!("day of meeting: {}", as_calendar_date(meeting.date())?);
    Ok(())
}
